//! Error type for export operations.

use crate::link::LinkError;
use joybridge_proto::OffsetError;

/// Error type for export operations.
///
/// Every variant is recoverable: the application keeps publishing records
/// whether or not the bridge is currently polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExportError {
    /// Request addressed a byte outside the 7-byte record.
    OutOfRange { offset: u8 },
    /// Serial transport not ready at setup.
    LinkUnavailable,
    /// Serial transport failed during a service pass.
    Link(LinkError),
    /// Polling interval of zero ticks.
    InvalidInterval,
}

impl From<OffsetError> for ExportError {
    fn from(err: OffsetError) -> Self {
        match err {
            OffsetError::OutOfRange { offset } => ExportError::OutOfRange { offset },
        }
    }
}

impl From<LinkError> for ExportError {
    fn from(err: LinkError) -> Self {
        ExportError::Link(err)
    }
}

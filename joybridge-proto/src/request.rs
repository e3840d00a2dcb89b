//! Request validation for the byte-offset protocol.
//!
//! A request is a single byte naming an offset into the encoded record. The
//! response is the byte stored at that offset. There is no framing beyond
//! this byte pair.

use crate::layout::{RecordBytes, RECORD_LEN};
use crate::types::StateRecord;

/// Error raised for a request byte that does not address the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetError {
    /// Offset outside `0..RECORD_LEN`.
    OutOfRange { offset: u8 },
}

/// A validated offset into an encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Offset(u8);

impl Offset {
    /// First offset of a frame.
    pub const FIRST: Self = Self(0);

    /// Last offset of a frame.
    pub const LAST: Self = Self(RECORD_LEN as u8 - 1);

    /// Validate a raw request byte.
    #[inline]
    pub const fn new(raw: u8) -> Result<Self, OffsetError> {
        if (raw as usize) < RECORD_LEN {
            Ok(Self(raw))
        } else {
            Err(OffsetError::OutOfRange { offset: raw })
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this offset starts a frame.
    #[inline]
    #[must_use]
    pub const fn is_frame_start(self) -> bool {
        self.0 == 0
    }

    /// Iterate every offset of a frame in order.
    pub fn all() -> impl Iterator<Item = Offset> {
        (0..RECORD_LEN as u8).map(Offset)
    }

    /// Byte of `bytes` addressed by this offset.
    #[inline]
    #[must_use]
    pub const fn select(self, bytes: &RecordBytes) -> u8 {
        bytes[self.0 as usize]
    }
}

impl TryFrom<u8> for Offset {
    type Error = OffsetError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Offset> for u8 {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

impl StateRecord {
    /// Byte at a raw offset of the encoded record.
    #[inline]
    pub fn byte(&self, offset: u8) -> Result<u8, OffsetError> {
        let offset = Offset::new(offset)?;
        Ok(offset.select(&self.to_bytes()))
    }
}

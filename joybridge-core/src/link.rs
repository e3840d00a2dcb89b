//! Serial link trait and error types.

/// Error type for serial link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// I/O error while reading a request byte.
    Read,
    /// I/O error while writing a response byte.
    Write,
    /// Link reported pending input but yielded none.
    Closed,
}

/// Blocking byte-oriented serial link.
///
/// The byte server runs from the timer interrupt and must finish each pass,
/// so this trait is blocking rather than async. `write_byte` may wait for a
/// free slot in the transmit buffer but must not wait on the remote peer.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait SerialLink {
    /// Check if the transport is initialized and usable.
    ///
    /// Checked once by setup. Adapters over an owned HAL driver are ready by
    /// construction unless the board code says otherwise.
    fn is_ready(&self) -> bool;

    /// Check if at least one byte can be read without blocking.
    fn read_ready(&mut self) -> Result<bool, LinkError>;

    /// Read one byte. Only called after `read_ready` returned `true`.
    fn read_byte(&mut self) -> Result<u8, LinkError>;

    /// Write one byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError>;
}

impl<L: SerialLink + ?Sized> SerialLink for &mut L {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn read_ready(&mut self) -> Result<bool, LinkError> {
        (**self).read_ready()
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        (**self).write_byte(byte)
    }
}

/// [`SerialLink`] over any blocking `embedded-io` transport.
///
/// Works with UART drivers that implement [`embedded_io::Read`],
/// [`embedded_io::ReadReady`] and [`embedded_io::Write`], such as buffered
/// HAL UARTs.
#[cfg(feature = "embedded-io")]
pub struct IoLink<T> {
    io: T,
    ready: bool,
}

#[cfg(feature = "embedded-io")]
impl<T> IoLink<T> {
    /// Wrap a configured transport. The link reports ready.
    #[must_use]
    pub fn new(io: T) -> Self {
        Self::with_ready(io, true)
    }

    /// Wrap a transport whose readiness the board code determined, e.g. a
    /// UART whose bridge-side pins are not populated.
    #[must_use]
    pub fn with_ready(io: T, ready: bool) -> Self {
        Self { io, ready }
    }

    /// Mark the transport usable or not.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Get a reference to the transport.
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Get a mutable reference to the transport.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Decompose into the transport.
    pub fn into_inner(self) -> T {
        self.io
    }
}

#[cfg(feature = "embedded-io")]
impl<T> SerialLink for IoLink<T>
where
    T: embedded_io::Read + embedded_io::ReadReady + embedded_io::Write,
{
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn read_ready(&mut self) -> Result<bool, LinkError> {
        self.io.read_ready().map_err(|_| LinkError::Read)
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        let mut byte = [0u8; 1];
        match self.io.read(&mut byte) {
            Ok(0) => Err(LinkError::Closed),
            Ok(_) => Ok(byte[0]),
            Err(_) => Err(LinkError::Read),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.io.write_all(&[byte]).map_err(|_| LinkError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLink;

    fn echo_once<L: SerialLink>(mut link: L) -> Result<bool, LinkError> {
        assert!(link.is_ready());
        if !link.read_ready()? {
            return Ok(false);
        }
        let byte = link.read_byte()?;
        link.write_byte(byte.wrapping_add(1))?;
        Ok(true)
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut link = MockLink::with_requests(&[4]);
        assert_eq!(echo_once(&mut link), Ok(true));
        assert_eq!(echo_once(&mut link), Ok(false));
        assert_eq!(link.responses(), &[5]);
    }

    #[cfg(feature = "embedded-io")]
    mod io {
        extern crate std;

        use super::super::*;
        use crate::context::ExportContext;
        use crate::error::ExportError;
        use core::convert::Infallible;
        use std::vec::Vec;

        struct Loopback {
            rx: Vec<u8>,
            tx: Vec<u8>,
        }

        impl embedded_io::ErrorType for Loopback {
            type Error = Infallible;
        }

        impl embedded_io::Read for Loopback {
            fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                if self.rx.is_empty() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.rx.remove(0);
                Ok(1)
            }
        }

        impl embedded_io::ReadReady for Loopback {
            fn read_ready(&mut self) -> Result<bool, Self::Error> {
                Ok(!self.rx.is_empty())
            }
        }

        impl embedded_io::Write for Loopback {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                self.tx.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        #[test]
        fn test_io_link_reads_and_writes() {
            let mut link = IoLink::new(Loopback {
                rx: std::vec![1, 2],
                tx: Vec::new(),
            });
            assert!(link.is_ready());
            assert_eq!(link.read_ready(), Ok(true));
            assert_eq!(link.read_byte(), Ok(1));
            assert_eq!(link.read_byte(), Ok(2));
            assert_eq!(link.read_ready(), Ok(false));
            assert_eq!(link.read_byte(), Err(LinkError::Closed));
            assert_eq!(link.write_byte(0x80), Ok(()));
            assert_eq!(link.into_inner().tx, std::vec![0x80]);
        }

        #[test]
        fn test_io_link_not_ready_fails_setup() {
            let context = ExportContext::new();
            let mut link = IoLink::with_ready(
                Loopback {
                    rx: Vec::new(),
                    tx: Vec::new(),
                },
                false,
            );
            assert!(!link.is_ready());
            assert_eq!(context.setup(&link), Err(ExportError::LinkUnavailable));

            link.set_ready(true);
            assert_eq!(context.setup(&link), Ok(()));
        }
    }
}

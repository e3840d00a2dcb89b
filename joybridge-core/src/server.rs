//! ByteServer: answers byte-offset requests from the bridge.
//!
//! Each request byte read from the link names an offset into the encoded
//! record; the reply is the byte at that offset. A pass drains every pending
//! request and returns as soon as the link has nothing left to read.

use crate::buffer::StateBuffer;
use crate::error::ExportError;
use crate::link::{LinkError, SerialLink};
use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use joybridge_proto::{Offset, RecordBytes};
use portable_atomic::{AtomicU32, Ordering};

/// Which record version a request is answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnapshotPolicy {
    /// Read the live buffer for every request. A publish landing between two
    /// requests of one session yields a frame mixing both records.
    #[default]
    PerRequest,
    /// Latch the whole record when offset 0 is requested and answer the
    /// following offsets from the latch until offset 6 has been served.
    /// A bridge reading 0..=6 in order always receives one coherent record.
    ///
    /// A session may span several passes. The latch is dropped early when a
    /// pass fails on the link or finds no request at all, so an abandoned
    /// session never pins an old record.
    LatchOnFrameStart,
}

/// Outcome of one service pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceReport {
    /// Requests answered with a byte.
    pub served: u32,
    /// Requests rejected as out of range. No byte is sent for these.
    pub rejected: u32,
    /// Offset of the last rejected request.
    pub last_rejected: Option<u8>,
}

impl ServiceReport {
    /// Check if the pass saw no requests at all.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.served == 0 && self.rejected == 0
    }
}

/// Running totals across service passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceStats {
    pub passes: u32,
    pub served: u32,
    pub rejected: u32,
    pub link_errors: u32,
}

/// Request/response engine run from the timer interrupt.
pub struct ByteServer {
    policy: SnapshotPolicy,
    latch: Mutex<CriticalSectionRawMutex, Cell<Option<RecordBytes>>>,
    passes: AtomicU32,
    served: AtomicU32,
    rejected: AtomicU32,
    link_errors: AtomicU32,
}

impl ByteServer {
    #[must_use]
    pub const fn new(policy: SnapshotPolicy) -> Self {
        Self {
            policy,
            latch: Mutex::new(Cell::new(None)),
            passes: AtomicU32::new(0),
            served: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
            link_errors: AtomicU32::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> SnapshotPolicy {
        self.policy
    }

    /// Drain all pending requests from `link`, answering each from `buffer`.
    ///
    /// Out-of-range requests are counted and skipped without a reply; the
    /// pass continues with the next request. A link error ends the pass.
    pub fn service<L: SerialLink + ?Sized>(
        &self,
        buffer: &StateBuffer,
        link: &mut L,
    ) -> Result<ServiceReport, ExportError> {
        let mut report = ServiceReport::default();
        let result = self.drain(buffer, link, &mut report);

        self.passes.fetch_add(1, Ordering::Relaxed);
        self.served.fetch_add(report.served, Ordering::Relaxed);
        self.rejected.fetch_add(report.rejected, Ordering::Relaxed);

        let session_over = result.is_err() || report.is_empty();
        if session_over && self.policy == SnapshotPolicy::LatchOnFrameStart {
            self.clear_latch();
        }

        match result {
            Ok(()) => Ok(report),
            Err(e) => {
                self.link_errors.fetch_add(1, Ordering::Relaxed);
                Err(ExportError::Link(e))
            }
        }
    }

    fn drain<L: SerialLink + ?Sized>(
        &self,
        buffer: &StateBuffer,
        link: &mut L,
        report: &mut ServiceReport,
    ) -> Result<(), LinkError> {
        while link.read_ready()? {
            let request = link.read_byte()?;
            match self.respond(buffer, request) {
                Ok(byte) => {
                    link.write_byte(byte)?;
                    report.served += 1;
                }
                Err(_) => {
                    report.rejected += 1;
                    report.last_rejected = Some(request);
                }
            }
        }
        Ok(())
    }

    /// Resolve a single request byte to its reply.
    pub fn respond(&self, buffer: &StateBuffer, request: u8) -> Result<u8, ExportError> {
        let offset = Offset::new(request)?;
        match self.policy {
            SnapshotPolicy::PerRequest => Ok(buffer.read_offset(offset)),
            SnapshotPolicy::LatchOnFrameStart => Ok(self.latched(buffer, offset)),
        }
    }

    fn latched(&self, buffer: &StateBuffer, offset: Offset) -> u8 {
        self.latch.lock(|latch| {
            let bytes = match latch.get() {
                Some(bytes) if !offset.is_frame_start() => bytes,
                _ => buffer.bytes(),
            };
            latch.set(if offset == Offset::LAST { None } else { Some(bytes) });
            offset.select(&bytes)
        })
    }

    /// Drop any latched record; the next request reads the live buffer.
    pub fn clear_latch(&self) {
        self.latch.lock(|latch| latch.set(None));
    }

    /// Totals since creation or the last [`reset_stats`](Self::reset_stats).
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            passes: self.passes.load(Ordering::Relaxed),
            served: self.served.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            link_errors: self.link_errors.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.passes.store(0, Ordering::Relaxed);
        self.served.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.link_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for ByteServer {
    fn default() -> Self {
        Self::new(SnapshotPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mock::MockLink;
    use joybridge_proto::{Axis, Button, StateRecord, BLANK_BYTES};
    use std::sync::Arc;

    fn triangle_left_200() -> StateRecord {
        StateRecord::blank()
            .with_button(Button::Triangle, true)
            .with_axis(Axis::LeftStickX, 200)
    }

    #[test]
    fn test_empty_link_is_a_noop_pass() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        let mut link = MockLink::new();

        let report = server.service(&buffer, &mut link).unwrap();
        assert!(report.is_empty());
        assert!(link.responses().is_empty());
        assert_eq!(server.stats().passes, 1);
    }

    #[test]
    fn test_full_frame_round_trip() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        let record = triangle_left_200();
        buffer.publish(record);

        let mut link = MockLink::with_requests(&[0, 1, 2, 3, 4, 5, 6]);
        let report = server.service(&buffer, &mut link).unwrap();

        assert_eq!(report.served, 7);
        assert_eq!(link.responses(), &record.to_bytes());
        assert_eq!(StateRecord::from_bytes(&record.to_bytes()), record);
    }

    #[test]
    fn test_triangle_and_stick_scenario() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        buffer.publish(triangle_left_200());

        let mut link = MockLink::with_requests(&[0, 3, 4]);
        server.service(&buffer, &mut link).unwrap();

        let responses = link.responses();
        assert_eq!(responses[0] & Button::Triangle.bit_mask(), Button::Triangle.bit_mask());
        assert_eq!(responses[1], 200);
        assert_eq!(responses[2], 128);
    }

    #[test]
    fn test_out_of_range_request_rejected() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();

        assert_eq!(
            server.respond(&buffer, 9),
            Err(ExportError::OutOfRange { offset: 9 })
        );

        let mut link = MockLink::with_requests(&[9, 1, 200]);
        let report = server.service(&buffer, &mut link).unwrap();

        assert_eq!(report.served, 1);
        assert_eq!(report.rejected, 2);
        assert_eq!(report.last_rejected, Some(200));
        assert_eq!(link.responses(), &[BLANK_BYTES[1]]);
        assert_eq!(server.stats().rejected, 2);
    }

    #[test]
    fn test_link_error_ends_pass() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        let mut link = MockLink::with_requests(&[0, 1, 2]).fail_write_at(1);

        assert_eq!(
            server.service(&buffer, &mut link),
            Err(ExportError::Link(LinkError::Write))
        );
        assert_eq!(link.responses(), &[BLANK_BYTES[0]]);
        assert_eq!(link.pending(), 1);

        let stats = server.stats();
        assert_eq!(stats.served, 1);
        assert_eq!(stats.link_errors, 1);

        // Next pass starts fresh with whatever is still queued
        let report = server.service(&buffer, &mut link).unwrap();
        assert_eq!(report.served, 1);
    }

    #[test]
    fn test_read_ready_error_reported() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        let mut link = MockLink::with_requests(&[0]).fail_ready();

        assert_eq!(
            server.service(&buffer, &mut link),
            Err(ExportError::Link(LinkError::Read))
        );
    }

    #[test]
    fn test_per_request_allows_torn_frame() {
        let server = ByteServer::new(SnapshotPolicy::PerRequest);
        let buffer = Arc::new(StateBuffer::new());
        let next = triangle_left_200();

        let writer = Arc::clone(&buffer);
        let mut link = MockLink::with_requests(&[0, 1, 2, 3, 4, 5, 6]).on_read(move |req| {
            if req == 2 {
                writer.publish(next);
            }
        });
        server.service(&*buffer, &mut link).unwrap();

        let responses = link.responses();
        assert_eq!(&responses[..2], &BLANK_BYTES[..2]);
        assert_eq!(&responses[2..], &next.to_bytes()[2..]);
        assert_eq!(responses[3], 200);
    }

    #[test]
    fn test_latch_keeps_frame_coherent() {
        let server = ByteServer::new(SnapshotPolicy::LatchOnFrameStart);
        let buffer = Arc::new(StateBuffer::new());
        let next = triangle_left_200();

        let writer = Arc::clone(&buffer);
        let mut link = MockLink::with_requests(&[0, 1, 2, 3, 4, 5, 6, 0, 3]).on_read(move |req| {
            if req == 2 {
                writer.publish(next);
            }
        });
        server.service(&*buffer, &mut link).unwrap();

        let responses = link.responses();
        assert_eq!(&responses[..7], &BLANK_BYTES);
        // New session latches the new record
        assert_eq!(responses[7], 0x01);
        assert_eq!(responses[8], 200);
    }

    #[test]
    fn test_latch_released_after_last_offset() {
        let server = ByteServer::new(SnapshotPolicy::LatchOnFrameStart);
        let buffer = StateBuffer::new();

        assert_eq!(server.respond(&buffer, 0), Ok(BLANK_BYTES[0]));
        assert_eq!(server.respond(&buffer, 6), Ok(BLANK_BYTES[6]));

        buffer.publish(triangle_left_200());
        // No session open: a lone request reads the live buffer
        assert_eq!(server.respond(&buffer, 3), Ok(200));
    }

    #[test]
    fn test_latch_spans_passes() {
        let server = ByteServer::new(SnapshotPolicy::LatchOnFrameStart);
        let buffer = StateBuffer::new();

        let mut link = MockLink::with_requests(&[0, 1, 2]);
        server.service(&buffer, &mut link).unwrap();
        buffer.publish(triangle_left_200());

        link.push_requests(&[3, 4, 5, 6]);
        server.service(&buffer, &mut link).unwrap();
        assert_eq!(link.responses(), &BLANK_BYTES);
    }

    #[test]
    fn test_idle_pass_drops_abandoned_latch() {
        let server = ByteServer::new(SnapshotPolicy::LatchOnFrameStart);
        let buffer = StateBuffer::new();

        let mut link = MockLink::with_requests(&[0, 1, 2]);
        server.service(&buffer, &mut link).unwrap();
        let report = server.service(&buffer, &mut link).unwrap();
        assert!(report.is_empty());

        buffer.publish(triangle_left_200());
        link.push_requests(&[3]);
        server.service(&buffer, &mut link).unwrap();
        assert_eq!(link.responses()[3], 200);
    }

    #[test]
    fn test_link_error_drops_latch() {
        let server = ByteServer::new(SnapshotPolicy::LatchOnFrameStart);
        let buffer = StateBuffer::new();

        let mut link = MockLink::with_requests(&[0, 1, 2]).fail_write_at(2);
        assert_eq!(
            server.service(&buffer, &mut link),
            Err(ExportError::Link(LinkError::Write))
        );
        assert_eq!(link.responses(), &BLANK_BYTES[..2]);

        buffer.publish(triangle_left_200());
        link.push_requests(&[3]);
        server.service(&buffer, &mut link).unwrap();
        assert_eq!(link.responses(), &[BLANK_BYTES[0], BLANK_BYTES[1], 200]);
    }

    #[test]
    fn test_reset_stats() {
        let server = ByteServer::default();
        let buffer = StateBuffer::new();
        let mut link = MockLink::with_requests(&[0, 8]);
        server.service(&buffer, &mut link).unwrap();
        assert_ne!(server.stats(), ServiceStats::default());

        server.reset_stats();
        assert_eq!(server.stats(), ServiceStats::default());
    }
}

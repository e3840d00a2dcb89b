//! StateBuffer: the single-slot hand-off between application and interrupt.

use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use joybridge_proto::{decode, Offset, OffsetError, RecordBytes, StateRecord, BLANK_BYTES};

/// Storage for the record currently served to the bridge.
///
/// The record is kept encoded, so the interrupt path only copies bytes.
/// Every access goes through a critical section: a publish from the
/// application can never be observed half-written by the byte server.
///
/// A multi-byte polling session is *not* covered by that guarantee. Two
/// requests of one session may straddle a publish and see different records;
/// see [`crate::SnapshotPolicy`] for the alternative.
pub struct StateBuffer {
    slot: Mutex<CriticalSectionRawMutex, Cell<RecordBytes>>,
}

impl StateBuffer {
    /// Create a buffer holding [`StateRecord::blank`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(BLANK_BYTES)),
        }
    }

    /// Replace the whole record.
    ///
    /// Encoding happens outside the critical section; only the 7-byte copy
    /// runs with interrupts masked.
    #[inline]
    pub fn publish(&self, record: StateRecord) {
        self.publish_bytes(record.to_bytes());
    }

    /// Replace the whole record with already-encoded bytes.
    #[inline]
    pub fn publish_bytes(&self, bytes: RecordBytes) {
        self.slot.lock(|slot| slot.set(bytes));
    }

    /// Byte at `offset` of the current record.
    #[inline]
    pub fn read_byte(&self, offset: u8) -> Result<u8, OffsetError> {
        let offset = Offset::new(offset)?;
        Ok(self.read_offset(offset))
    }

    /// Byte at a validated offset of the current record.
    #[inline]
    #[must_use]
    pub fn read_offset(&self, offset: Offset) -> u8 {
        self.slot.lock(|slot| offset.select(&slot.get()))
    }

    /// Copy of the current encoded record.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> RecordBytes {
        self.slot.lock(Cell::get)
    }

    /// Decoded copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> StateRecord {
        decode(&self.bytes())
    }

    /// Restore [`StateRecord::blank`].
    pub fn reset(&self) {
        self.publish_bytes(BLANK_BYTES);
    }
}

impl Default for StateBuffer {
    fn default() -> Self {
        Self::new()
    }
}

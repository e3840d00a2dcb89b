//! Wire layout of a [`StateRecord`].
//!
//! ```text
//! byte 0  bit0 triangle  bit1 circle   bit2 square  bit3 cross
//!         bit4 l1        bit5 l2       bit6 l3      bit7 r1
//! byte 1  bit0 r2        bit1 r3       bit2 select  bit3 start
//!         bit4 home      bit5 dpad-L   bit6 dpad-U  bit7 dpad-R
//! byte 2  bit0 dpad-D    bits1-7 padding (sent as 0, ignored on decode)
//! byte 3  left stick X
//! byte 4  left stick Y
//! byte 5  right stick X
//! byte 6  right stick Y
//! ```
//!
//! The layout is driven by [`Button::bit_offset`] and [`Axis::byte_offset`],
//! never by the in-memory representation of [`StateRecord`].

use crate::types::{Axis, Button, Buttons, StateRecord};

/// Size of an encoded record in bytes.
pub const RECORD_LEN: usize = 7;

/// Bytes occupied by the boolean block (17 bits + 7 padding bits).
pub const BUTTON_BYTES: usize = 3;

/// An encoded record.
pub type RecordBytes = [u8; RECORD_LEN];

/// Encoding of [`StateRecord::blank`].
pub const BLANK_BYTES: RecordBytes = [0x00, 0x00, 0x00, 0x80, 0x80, 0x80, 0x80];

/// Encode a record into its 7-byte wire form.
#[must_use]
pub fn encode(record: &StateRecord) -> RecordBytes {
    let mut bytes = [0u8; RECORD_LEN];
    for button in Button::ALL {
        if record.is_pressed(button) {
            bytes[button.byte_offset()] |= button.bit_mask();
        }
    }
    for axis in Axis::ALL {
        bytes[axis.byte_offset()] = record.axis(axis);
    }
    bytes
}

/// Decode a 7-byte wire form. Padding bits are ignored.
#[must_use]
pub fn decode(bytes: &RecordBytes) -> StateRecord {
    let mut buttons = Buttons::NONE;
    for button in Button::ALL {
        let set = bytes[button.byte_offset()] & button.bit_mask() != 0;
        buttons.set(button, set);
    }
    let mut record = StateRecord {
        buttons,
        ..StateRecord::blank()
    };
    for axis in Axis::ALL {
        record.set_axis(axis, bytes[axis.byte_offset()]);
    }
    record
}

impl StateRecord {
    /// Encode into the 7-byte wire form. See [`encode`].
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> RecordBytes {
        encode(self)
    }

    /// Decode from the 7-byte wire form. See [`decode`].
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: &RecordBytes) -> Self {
        decode(bytes)
    }
}

impl From<&StateRecord> for RecordBytes {
    fn from(record: &StateRecord) -> Self {
        encode(record)
    }
}

impl From<&RecordBytes> for StateRecord {
    fn from(bytes: &RecordBytes) -> Self {
        decode(bytes)
    }
}

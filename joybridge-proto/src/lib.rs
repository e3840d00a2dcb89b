//! Controller state record and its wire layout for the serial bridge.
//!
//! A USB bridge controller polls the device over UART, one byte at a time,
//! for a 7-byte snapshot of the controller state. This crate defines that
//! snapshot and the byte-offset request it answers:
//!
//! - **Types**: [`StateRecord`], [`Buttons`], [`Button`], [`AnalogStick`], [`Axis`]
//! - **Layout**: [`encode`], [`decode`], [`RECORD_LEN`]
//! - **Requests**: [`Offset`], [`OffsetError`]
//!
//! # Protocol
//!
//! ```text
//! bridge -> device : <offset>   1 byte, 0..=6
//! device -> bridge : <byte>     byte at <offset> of the current record
//! ```
//!
//! No framing, checksums or versioning. Reordering fields breaks every bridge.
//!
//! # Example
//!
//! ```
//! use joybridge_proto::{Axis, Button, StateRecord};
//!
//! let record = StateRecord::blank()
//!     .with_button(Button::Triangle, true)
//!     .with_axis(Axis::LeftStickX, 200);
//!
//! let bytes = record.to_bytes();
//! assert_eq!(bytes[0], 0x01);
//! assert_eq!(bytes[3], 200);
//! assert_eq!(record.byte(3), Ok(200));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod layout;
pub mod request;
pub mod types;

pub use layout::{decode, encode, RecordBytes, BLANK_BYTES, BUTTON_BYTES, RECORD_LEN};
pub use request::{Offset, OffsetError};
pub use types::{AnalogStick, Axis, Button, Buttons, StateRecord};

//! Platform-agnostic core of the serial state export.
//!
//! The application publishes a [`StateRecord`]; a periodic timer interrupt
//! polls a serial link and answers the bridge's byte-offset requests from the
//! most recently published record. This crate has no chip dependencies and
//! runs unchanged on host for testing.
//!
//! # Overview
//!
//! - [`buffer`]: single-slot record hand-off ([`StateBuffer`])
//! - [`ticker`]: tick counting and interval config ([`PeriodicTicker`], [`TickerConfig`])
//! - [`server`]: request/response engine ([`ByteServer`], [`SnapshotPolicy`])
//! - [`link`]: serial transport trait ([`SerialLink`])
//! - [`context`]: owns all of the above ([`ExportContext`])
//!
//! # Contexts
//!
//! ```text
//! application loop            timer interrupt (every ~1024 us)
//! ----------------            --------------------------------
//! ctx.publish(record) ──┐     ctx.on_tick(&mut link)
//!                       │       └─ interval reached?
//!                       ▼           └─ while link readable:
//!            [critical section]          idx = read; write(buffer[idx])
//!              StateBuffer  ◄────────────┘
//! ```
//!
//! The 7-byte copy into the buffer runs with interrupts masked, so the
//! interrupt never sees a half-written record. Consecutive requests of one
//! polling session may still straddle a publish.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`embedded-io`**: Enable [`IoLink`] for `embedded-io` transports
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations. It
//! needs a `critical-section` implementation from the HAL (or the
//! `critical-section/std` feature on host).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod context;
pub mod error;
pub mod link;
pub mod server;
pub mod ticker;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use buffer::StateBuffer;
pub use context::{ExportContext, TickOutcome};
pub use error::ExportError;
#[cfg(feature = "embedded-io")]
pub use link::IoLink;
pub use link::{LinkError, SerialLink};
pub use server::{ByteServer, ServiceReport, ServiceStats, SnapshotPolicy};
pub use ticker::{PeriodicTicker, TickPhase, TickerConfig};

pub use joybridge_proto::{
    AnalogStick, Axis, Button, Buttons, Offset, OffsetError, StateRecord, RECORD_LEN,
};

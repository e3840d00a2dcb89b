//! Serial controller-state export for RP2040.
//!
//! The application samples its inputs and publishes a 7-byte state record.
//! A high-priority interrupt executor ticks every 1024 us and answers the
//! USB bridge MCU's byte-offset requests on UART0 from the latest record.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO  | Description |
//! |----------|-------|-------------|
//! | UART0 TX | 0     | Responses to the bridge |
//! | UART0 RX | 1     | Offset requests from the bridge |
//! | Buttons  | 2-9   | Triangle, circle, square, cross, d-pad (active low) |
//!
//! # Architecture
//!
//! Two execution contexts share one [`ExportContext`]:
//!
//! - **Thread mode**: application task (sample + publish) and a stats logger
//! - **SWI_IRQ_1 interrupt executor**: tick task calling `on_tick` on the UART link
//!
//! `UART0_IRQ` runs above the tick executor so a blocking response write can
//! always drain the transmit ring.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`latch-frames`**: Serve each 0..=6 session from one latched record
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`joybridge_core`] that
//! application code needs, so consumers only depend on this crate.

#![no_std]

pub use joybridge_core::{
    AnalogStick, Axis, Button, Buttons, ExportContext, ExportError, IoLink, ServiceStats,
    SnapshotPolicy, StateRecord, TickOutcome,
};

pub mod config;
pub mod pad;

pub use pad::{PadError, PadInputs};

/// The bridge link: buffered UART driven through `embedded-io`.
pub type UartLink = IoLink<embassy_rp::uart::BufferedUart>;

/// Snapshot policy selected by Cargo features.
#[cfg(not(feature = "latch-frames"))]
pub const SNAPSHOT_POLICY: SnapshotPolicy = SnapshotPolicy::PerRequest;

/// Snapshot policy selected by Cargo features.
#[cfg(feature = "latch-frames")]
pub const SNAPSHOT_POLICY: SnapshotPolicy = SnapshotPolicy::LatchOnFrameStart;

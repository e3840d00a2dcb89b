//! ExportContext: ties the state buffer, tick counter and byte server together.

use crate::buffer::StateBuffer;
use crate::error::ExportError;
use crate::link::SerialLink;
use crate::server::{ByteServer, ServiceReport, ServiceStats, SnapshotPolicy};
use crate::ticker::{PeriodicTicker, TickPhase, TickerConfig};
use joybridge_proto::StateRecord;

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Interval not reached, the link was not touched.
    Idle,
    /// The link was serviced.
    Serviced(ServiceReport),
}

/// Everything shared between the application loop and the timer interrupt.
///
/// Usually placed in a `static` and referenced from both contexts:
/// the application calls [`publish`](Self::publish), the timer calls
/// [`on_tick`](Self::on_tick). All methods take `&self`.
///
/// # Example
///
/// ```
/// use joybridge_core::{ExportContext, StateRecord, Button};
///
/// static EXPORT: ExportContext = ExportContext::new();
///
/// let mut record = StateRecord::blank();
/// record.set_button(Button::Cross, true);
/// EXPORT.publish(record);
/// assert_eq!(EXPORT.buffer().snapshot(), record);
/// ```
pub struct ExportContext {
    buffer: StateBuffer,
    ticker: PeriodicTicker,
    server: ByteServer,
}

impl ExportContext {
    /// Create a context with a blank record, polling every tick.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(SnapshotPolicy::PerRequest)
    }

    /// Create a context answering requests with the given snapshot policy.
    #[must_use]
    pub const fn with_policy(policy: SnapshotPolicy) -> Self {
        Self {
            buffer: StateBuffer::new(),
            ticker: PeriodicTicker::new(TickerConfig::DEFAULT),
            server: ByteServer::new(policy),
        }
    }

    /// Prepare for serving: blank record, default interval, fresh counters.
    ///
    /// Fails with [`ExportError::LinkUnavailable`] if the link is not ready;
    /// the context is left untouched in that case.
    pub fn setup<L: SerialLink + ?Sized>(&self, link: &L) -> Result<(), ExportError> {
        self.setup_with_config(link, TickerConfig::DEFAULT)
    }

    /// Same as [`setup`](Self::setup) with an explicit polling interval in ticks.
    pub fn setup_with_interval<L: SerialLink + ?Sized>(
        &self,
        link: &L,
        interval: u32,
    ) -> Result<(), ExportError> {
        self.setup_with_config(link, TickerConfig::new(interval)?)
    }

    pub fn setup_with_config<L: SerialLink + ?Sized>(
        &self,
        link: &L,
        config: TickerConfig,
    ) -> Result<(), ExportError> {
        if !link.is_ready() {
            return Err(ExportError::LinkUnavailable);
        }
        self.buffer.reset();
        self.ticker.configure(config);
        self.server.clear_latch();
        self.server.reset_stats();
        Ok(())
    }

    /// Replace the record served to the bridge.
    #[inline]
    pub fn publish(&self, record: StateRecord) {
        self.buffer.publish(record);
    }

    /// Timer callback: count the tick and service `link` when due.
    pub fn on_tick<L: SerialLink + ?Sized>(&self, link: &mut L) -> Result<TickOutcome, ExportError> {
        match self.ticker.tick() {
            TickPhase::Idle => Ok(TickOutcome::Idle),
            TickPhase::Service => self
                .server
                .service(&self.buffer, link)
                .map(TickOutcome::Serviced),
        }
    }

    /// Change the polling interval at runtime.
    pub fn set_interval(&self, interval: u32) -> Result<(), ExportError> {
        self.ticker.configure(TickerConfig::new(interval)?);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.server.stats()
    }

    /// Get a reference to the state buffer.
    pub fn buffer(&self) -> &StateBuffer {
        &self.buffer
    }

    /// Get a reference to the tick counter.
    pub fn ticker(&self) -> &PeriodicTicker {
        &self.ticker
    }

    /// Get a reference to the byte server.
    pub fn server(&self) -> &ByteServer {
        &self.server
    }
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::new()
    }
}

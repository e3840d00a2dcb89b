//! PeriodicTicker: decides on which timer ticks the serial link is polled.

use crate::error::ExportError;
use portable_atomic::{AtomicU32, Ordering};

/// Polling configuration for [`PeriodicTicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickerConfig {
    interval: u32,
}

impl TickerConfig {
    /// Poll on every tick.
    pub const DEFAULT_INTERVAL: u32 = 1;

    pub const DEFAULT: Self = Self {
        interval: Self::DEFAULT_INTERVAL,
    };

    /// Poll every `interval` timer ticks. Zero is rejected.
    pub const fn new(interval: u32) -> Result<Self, ExportError> {
        if interval == 0 {
            return Err(ExportError::InvalidInterval);
        }
        Ok(Self { interval })
    }

    #[inline]
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a tick decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickPhase {
    /// Interval not reached yet; nothing to do.
    Idle,
    /// Interval reached; the counter was reset and the link must be serviced.
    Service,
}

/// Interval counter driven by the hardware timer.
///
/// [`tick`](Self::tick) is meant to be called from a single interrupt
/// context. The interval may be changed from the application at any time;
/// the comparison is `counter >= interval`, so lowering it takes effect on
/// the next tick.
pub struct PeriodicTicker {
    counter: AtomicU32,
    interval: AtomicU32,
}

impl PeriodicTicker {
    /// Create a ticker in the idle state with a zero counter.
    #[must_use]
    pub const fn new(config: TickerConfig) -> Self {
        Self {
            counter: AtomicU32::new(0),
            interval: AtomicU32::new(config.interval),
        }
    }

    /// Advance by one timer tick.
    pub fn tick(&self) -> TickPhase {
        // Single writer: plain load/store avoids an RMW on cores without CAS
        let count = self.counter.load(Ordering::Relaxed).wrapping_add(1);
        if count >= self.interval.load(Ordering::Relaxed) {
            self.counter.store(0, Ordering::Relaxed);
            TickPhase::Service
        } else {
            self.counter.store(count, Ordering::Relaxed);
            TickPhase::Idle
        }
    }

    /// Apply a new configuration and restart counting from zero.
    pub fn configure(&self, config: TickerConfig) {
        self.interval.store(config.interval, Ordering::Relaxed);
        self.counter.store(0, Ordering::Relaxed);
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> TickerConfig {
        TickerConfig {
            interval: self.interval.load(Ordering::Relaxed),
        }
    }

    /// Ticks counted since the last service.
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for PeriodicTicker {
    fn default() -> Self {
        Self::new(TickerConfig::DEFAULT)
    }
}

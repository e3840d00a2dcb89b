//! Board-level constants for the serial export.

use embassy_rp::uart::Config as UartConfig;
use embassy_time::Duration;

/// UART rate shared with the bridge firmware. Changing it means reflashing
/// the bridge as well.
pub const BAUD_RATE: u32 = 38_400;

/// Period of the export timer.
pub const TICK_PERIOD_US: u64 = 1024;

/// Timer ticks between two polls of the UART.
pub const POLL_INTERVAL_TICKS: u32 = 1;

/// UART transmit ring size. A full 7-byte frame fits with room to spare.
pub const UART_TX_BUFFER: usize = 32;

/// UART receive ring size.
pub const UART_RX_BUFFER: usize = 32;

/// Application loop period (button sampling + publish).
pub const APP_LOOP_PERIOD: Duration = Duration::from_millis(1);

/// How often export statistics are logged.
pub const STATS_LOG_PERIOD: Duration = Duration::from_secs(10);

/// UART configuration for the bridge link: 38400 baud, 8N1.
#[must_use]
pub fn uart_config() -> UartConfig {
    let mut config = UartConfig::default();
    config.baudrate = BAUD_RATE;
    config
}

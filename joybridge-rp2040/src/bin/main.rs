#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use embassy_time::{Duration, Ticker, Timer};
use joybridge_rp2040::config::{
    uart_config, APP_LOOP_PERIOD, POLL_INTERVAL_TICKS, STATS_LOG_PERIOD, TICK_PERIOD_US,
    UART_RX_BUFFER, UART_TX_BUFFER,
};
use joybridge_rp2040::{Button, ExportContext, PadInputs, UartLink, SNAPSHOT_POLICY};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Record buffer, tick counter and byte server shared by both contexts.
static EXPORT: ExportContext = ExportContext::with_policy(SNAPSHOT_POLICY);

/// Preemptive executor standing in for the timer interrupt.
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_APP: StaticCell<Executor> = StaticCell::new();

static UART_TX: StaticCell<[u8; UART_TX_BUFFER]> = StaticCell::new();
static UART_RX: StaticCell<[u8; UART_RX_BUFFER]> = StaticCell::new();

type Pad = PadInputs<Input<'static>>;

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_TICK.on_interrupt()
}

#[entry]
fn main() -> ! {
    info!("joybridge starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- UART Setup ---
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        UART_TX.init([0; UART_TX_BUFFER]),
        UART_RX.init([0; UART_RX_BUFFER]),
        uart_config(),
    );
    let link = UartLink::new(uart);

    if let Err(e) = EXPORT.setup_with_interval(&link, POLL_INTERVAL_TICKS) {
        // Keep running: the application loop does not depend on the bridge
        error!("Export setup failed: {:?}", e);
    }

    // --- Buttons ---
    let mut pad = Pad::new();
    let bindings = [
        (Button::Triangle, Input::new(p.PIN_2, Pull::Up)),
        (Button::Circle, Input::new(p.PIN_3, Pull::Up)),
        (Button::Square, Input::new(p.PIN_4, Pull::Up)),
        (Button::Cross, Input::new(p.PIN_5, Pull::Up)),
        (Button::DpadLeft, Input::new(p.PIN_6, Pull::Up)),
        (Button::DpadUp, Input::new(p.PIN_7, Pull::Up)),
        (Button::DpadRight, Input::new(p.PIN_8, Pull::Up)),
        (Button::DpadDown, Input::new(p.PIN_9, Pull::Up)),
    ];
    for (button, pin) in bindings {
        if let Err(e) = pad.bind(button, pin) {
            warn!("Button {:?} not bound: {:?}", button, e);
        }
    }

    // --- Tick context ---
    // UART IRQ must outrank the tick executor, otherwise a blocking write
    // with a full TX ring would never drain.
    interrupt::UART0_IRQ.set_priority(Priority::P1);
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let tick_spawner = EXECUTOR_TICK.start(interrupt::SWI_IRQ_1);
    tick_spawner.spawn(tick_task(link)).unwrap();

    info!(
        "Serving state every {} tick(s) of {} us",
        POLL_INTERVAL_TICKS, TICK_PERIOD_US
    );

    // --- Application context ---
    let executor = EXECUTOR_APP.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(app_task(pad)).unwrap();
        spawner.spawn(stats_task()).unwrap();
    })
}

/// Tick task - runs in interrupt context and serves pending requests.
#[embassy_executor::task]
async fn tick_task(mut link: UartLink) {
    let mut ticker = Ticker::every(Duration::from_micros(TICK_PERIOD_US));
    loop {
        ticker.next().await;
        // Failures are counted in the stats; the next tick starts a fresh pass
        let _ = EXPORT.on_tick(&mut link);
    }
}

/// Application task - samples the buttons and publishes the record.
#[embassy_executor::task]
async fn app_task(mut pad: Pad) {
    loop {
        match pad.sample() {
            Ok(record) => EXPORT.publish(record),
            Err(e) => error!("Pad error: {:?}", e),
        }
        Timer::after(APP_LOOP_PERIOD).await;
    }
}

/// Stats task - logs what the tick context has been doing.
#[embassy_executor::task]
async fn stats_task() {
    let mut last = EXPORT.stats();
    loop {
        Timer::after(STATS_LOG_PERIOD).await;

        let stats = EXPORT.stats();
        info!(
            "Export: {} passes, {} bytes served",
            stats.passes.wrapping_sub(last.passes),
            stats.served.wrapping_sub(last.served)
        );
        if stats.rejected != last.rejected {
            warn!(
                "Rejected {} out-of-range request(s)",
                stats.rejected.wrapping_sub(last.rejected)
            );
        }
        if stats.link_errors != last.link_errors {
            warn!(
                "{} UART error(s) while serving",
                stats.link_errors.wrapping_sub(last.link_errors)
            );
        }
        last = stats;
    }
}

//! Light controller firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  ExpanderBoard          LogEventSender     CycleClock    │
//! │  (InputPort+OutputPort) (EventSender,      (elapsed ms)  │
//! │                          GlobalOffSender)                │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ NamedController → LightController (pure logic)     │  │
//! │  │ InputFilter · EventDetector · ActionManager        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use lightctl::adapters::expander::ExpanderBoard;
use lightctl::adapters::log_sink::LogEventSender;
use lightctl::adapters::time::CycleClock;
use lightctl::app::commands::CommandQueue;
use lightctl::app::facade::NamedController;
use lightctl::config::ControllerConfig;
use lightctl::{defaults, pins};

/// Staging requests from outside the cycle loop.
static COMMANDS: CommandQueue = CommandQueue::new();

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("lightctl v{}", env!("CARGO_PKG_VERSION"));

    let config = ControllerConfig::default();
    config.validate()?;

    // ── 2. I2C bus + expander board ───────────────────────────
    let peripherals = Peripherals::take()?;
    // SAFETY: the bus pins are used by nothing else on this board.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ)),
    )?;

    let board = Rc::new(RefCell::new(ExpanderBoard::new(i2c)));
    if !board.borrow_mut().begin() {
        warn!("not every expander answered, missing ones are retried each cycle");
    }

    // ── 3. Controller ─────────────────────────────────────────
    let cycle_period_ms = config.cycle_period_ms;
    let mut controller = NamedController::with_default_channels(config)?;
    {
        let core = controller.controller_mut();
        core.set_input_device(Rc::clone(&board));
        core.set_output_device(board);
        let sender = Rc::new(RefCell::new(LogEventSender::new()));
        core.set_event_sender(Rc::clone(&sender));
        core.set_global_off_sender(sender);
    }

    match controller.initialize_from_text(defaults::RULES_TEXT) {
        Ok(rules) => info!("{} rules active", rules),
        Err(e) => error!("initialization failed ({}), running degraded", e),
    }

    // ── 4. Control loop ───────────────────────────────────────
    let mut clock = CycleClock::new();
    loop {
        controller.apply_commands(&COMMANDS);
        controller.execute(clock.elapsed_ms());
        FreeRtos::delay_ms(cycle_period_ms);
    }
}

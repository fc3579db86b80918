//! Desktop simulator for the thermograph thermometer.
//!
//! Renders the 16x2 character LCD in an SDL2 window via
//! `embedded-graphics-simulator` and feeds the core application loop with
//! synthetic sensor data, so every display mode can be exercised without
//! hardware.
//!
//! # Key bindings
//!
//! | Key          | Button  |
//! |--------------|---------|
//! | Left / A     | LEFT    |
//! | Right / D    | RIGHT   |
//! | Up / W       | UP      |
//! | Down / S     | DOWN    |
//! | Enter / Space| SELECT  |
//! | Q / Escape   | Quit    |
//!
//! Settings come from `THERMOGRAPH_*` environment variables, optionally
//! loaded from a `.env` file in the working directory.

mod lcd;
mod sensors;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write as _;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, error, info, warn};

use thermograph_core::button::{Button, Keypad};
use thermograph_core::display::Display;
use thermograph_core::logging;
use thermograph_core::sensors::{CombinedNode, SensorNode, SensorService, ThermistorNode};
use thermograph_core::time::Clock;
use thermograph_core::{App, Config};

use lcd::{SCREEN_HEIGHT_PX, SCREEN_WIDTH_PX, SimulatedLcd};
use sensors::{SyntheticDht, SyntheticThermistor};

// ---------------------------------------------------------------------------
// Simulator constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 5;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

const ENV_PREFIX: &str = "THERMOGRAPH_";

// ---------------------------------------------------------------------------
// Host implementations of the core traits
// ---------------------------------------------------------------------------

/// Milliseconds since the simulator started.
#[derive(Clone, Copy)]
struct HostClock {
    start: Instant,
}

impl Clock for HostClock {
    fn millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Presses queued by the SDL event loop, consumed one per application step.
#[derive(Clone, Default)]
struct QueuedKeypad {
    pending: Rc<RefCell<VecDeque<Button>>>,
}

impl QueuedKeypad {
    fn press(&self, button: Button) {
        self.pending.borrow_mut().push_back(button);
    }
}

impl Keypad for QueuedKeypad {
    fn read_button(&mut self) -> Button {
        self.pending.borrow_mut().pop_front().unwrap_or_default()
    }
}

fn keycode_to_button(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::Left | Keycode::A => Some(Button::Left),
        Keycode::Right | Keycode::D => Some(Button::Right),
        Keycode::Up | Keycode::W => Some(Button::Up),
        Keycode::Down | Keycode::S => Some(Button::Down),
        Keycode::Return | Keycode::KpEnter | Keycode::Space => Some(Button::Select),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Configuration and logging
// ---------------------------------------------------------------------------

/// Defaults overlaid with `THERMOGRAPH_*` variables. Rejected settings are
/// returned so they can be reported once the logger is up.
fn load_config() -> (Config, Vec<String>) {
    let dotenv = dotenvy::dotenv();

    let mut config = Config::default();
    let mut rejected = Vec::new();
    if let Err(e) = &dotenv
        && !e.not_found()
    {
        rejected.push(format!(".env: {e}"));
    }

    for (key, value) in std::env::vars() {
        if !key.starts_with(ENV_PREFIX) {
            continue;
        }
        if let Err(e) = config.apply_override(&key, &value) {
            rejected.push(format!("{key}={value}: {e}"));
        }
    }
    (config, rejected)
}

/// `env_logger` with the same line header the firmware prints over RTT.
/// `RUST_LOG` still wins over the configured level.
fn init_logger(config: &Config, start: Instant) {
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .format(move |buf, record| {
            let mut header = String::new();
            let uptime_ms = start.elapsed().as_millis() as u64;
            let _ = logging::write_header(&mut header, uptime_ms, record.level());
            writeln!(buf, "{}{}", header, record.args())
        })
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let start = Instant::now();
    let (config, rejected) = load_config();
    init_logger(&config, start);

    info!("Starting thermograph simulator");
    for problem in &rejected {
        warn!("config: ignored {}", problem);
    }
    info!("config: {:?}", config);
    info!("Keys: arrows/WASD = LEFT RIGHT UP DOWN, Enter = SELECT, Q = quit");

    let keypad = QueuedKeypad::default();
    let sensors = SensorService::from_config(
        SensorNode::Thermistor(ThermistorNode::new(SyntheticThermistor::new(start))),
        SensorNode::Combined(CombinedNode::new(SyntheticDht::new(start))),
        &config,
    );
    let display = Display::new(SimulatedLcd::new(), config.bitmap_column, config.bitmap_row);
    let mut app = App::new(config, display, sensors, keypad.clone(), HostClock { start });

    let mut screen = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Thermograph Simulator", &output_settings);

    if let Err(e) = app.start() {
        error!("app: start failed: {}", e);
    }

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let lcd = app.display().lcd();
    let _ = lcd.draw(&mut screen);
    let mut painted = lcd.generation();
    window.update(&screen);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    if let Some(button) = keycode_to_button(keycode) {
                        debug!("key {:?} -> {:?}", keycode, button);
                        keypad.press(button);
                    }
                }
                _ => {}
            }
        }

        if let Err(e) = app.step() {
            error!("app: {}", e);
        }

        let lcd = app.display().lcd();
        if lcd.generation() != painted {
            let _ = lcd.draw(&mut screen);
            painted = lcd.generation();
            debug!("lcd: |{}|{}|", lcd.row_text(0), lcd.row_text(1));
        }
        window.update(&screen);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}

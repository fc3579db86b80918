#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{DriveMode, Flex, InputConfig, Level, Output, OutputConfig, Pull};
use log::{info, warn};

use thermograph_core::button::ButtonReader;
use thermograph_core::config::ConfigError;
use thermograph_core::display::Display;
use thermograph_core::sensors::{CombinedNode, SensorNode, SensorService, ThermistorNode};
use thermograph_core::{App, Config};
use thermograph_firmware::adc::AdcInput;
use thermograph_firmware::clock::UptimeClock;
use thermograph_firmware::dht::{Dht, DhtKind};
use thermograph_firmware::lcd::Hd44780;
use thermograph_firmware::logger;

/// Settings baked in at build time, see `build.rs`.
const OVERRIDES: [(&str, Option<&str>); 8] = [
    ("enable_filter", option_env!("THERMOGRAPH_ENABLE_FILTER")),
    ("chart_mode", option_env!("THERMOGRAPH_CHART_MODE")),
    ("log_level", option_env!("THERMOGRAPH_LOG_LEVEL")),
    ("sensor_period_ms", option_env!("THERMOGRAPH_SENSOR_PERIOD_MS")),
    (
        "history_interval_secs",
        option_env!("THERMOGRAPH_HISTORY_INTERVAL_SECS"),
    ),
    ("filter_delta", option_env!("THERMOGRAPH_FILTER_DELTA")),
    ("bitmap_column", option_env!("THERMOGRAPH_BITMAP_COLUMN")),
    ("bitmap_row", option_env!("THERMOGRAPH_BITMAP_ROW")),
];

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn load_config() -> (Config, heapless::Vec<(&'static str, ConfigError), 8>) {
    let mut config = Config::default();
    let mut rejected = heapless::Vec::new();
    for (key, value) in OVERRIDES {
        let Some(value) = value else { continue };
        if let Err(e) = config.apply_override(key, value) {
            let _ = rejected.push((key, e));
        }
    }
    (config, rejected)
}

#[allow(
    clippy::large_stack_frames,
    reason = "the whole application state lives on main's stack"
)]
#[esp_hal::main]
fn main() -> ! {
    rtt_target::rtt_init_print!();

    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    let (config, rejected) = load_config();
    logger::init(config.log_level.to_level_filter());
    for (key, e) in &rejected {
        warn!("config: ignored {}: {}", key, e);
    }
    info!("config: {:?}", config);

    // ADC1: keypad resistor ladder on GPIO1, thermistor divider on GPIO2.
    let mut adc_config = AdcConfig::new();
    let keypad_pin = adc_config.enable_pin(peripherals.GPIO1, Attenuation::_11dB);
    let thermistor_pin = adc_config.enable_pin(peripherals.GPIO2, Attenuation::_11dB);
    let adc = RefCell::new(Adc::new(peripherals.ADC1, adc_config));

    // DHT11 data line on GPIO4: open drain, released high.
    let mut dht_pin = Flex::new(peripherals.GPIO4);
    dht_pin.apply_output_config(
        &OutputConfig::default()
            .with_drive_mode(DriveMode::OpenDrain)
            .with_pull(Pull::Up),
    );
    dht_pin.apply_input_config(&InputConfig::default().with_pull(Pull::Up));
    dht_pin.set_output_enable(true);
    dht_pin.set_input_enable(true);

    // HD44780 on a 4-bit bus: RS, EN, D4..D7.
    let rs = Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default());
    let en = Output::new(peripherals.GPIO6, Level::Low, OutputConfig::default());
    let data = [
        Output::new(peripherals.GPIO7, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO8, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO9, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO10, Level::Low, OutputConfig::default()),
    ];
    let Ok(lcd) = Hd44780::new(rs, en, data, Delay::new());
    info!("LCD initialized!");

    let sensors = SensorService::from_config(
        SensorNode::Thermistor(ThermistorNode::new(AdcInput::new(&adc, thermistor_pin))),
        SensorNode::Combined(CombinedNode::new(Dht::new(
            dht_pin,
            Delay::new(),
            DhtKind::Dht11,
        ))),
        &config,
    );
    let keypad = ButtonReader::new(AdcInput::new(&adc, keypad_pin), Delay::new());
    let display = Display::new(lcd, config.bitmap_column, config.bitmap_row);

    App::new(config, display, sensors, keypad, UptimeClock).run()
}

//! ESP32-S3 firmware-specific modules for thermograph
//!
//! This crate contains the hardware adapters that cannot compile on desktop
//! targets: the ADC channels behind the thermistor and the keypad ladder,
//! the bit-banged DHT single-wire reader, the HD44780 4-bit bus driver, the
//! RTT logger and the uptime clock.

#![no_std]

pub mod adc;
pub mod clock;
pub mod dht;
pub mod lcd;
pub mod logger;

//! Resistor-ladder keypad.
//!
//! All five keys share one analog pin; each key pulls the divider to a
//! different level and releasing all of them leaves the pin near full scale.

use embedded_hal::delay::DelayNs;
use log::error;

use crate::sensors::AnalogInput;

/// Time to block after any press so one physical press is read once.
pub const DEBOUNCE_MS: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
    Select,
}

impl Button {
    /// Classify a raw ladder level. Thresholds are upper bounds, first match wins.
    pub const fn from_level(raw: u16) -> Self {
        match raw {
            0..50 => Self::Right,
            50..195 => Self::Up,
            195..380 => Self::Down,
            380..555 => Self::Left,
            555..790 => Self::Select,
            _ => Self::None,
        }
    }

    pub const fn is_pressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Source of button presses consumed by the application loop.
pub trait Keypad {
    fn read_button(&mut self) -> Button;
}

/// [`Keypad`] over an analog ladder with a blocking debounce delay.
pub struct ButtonReader<A, D> {
    adc: A,
    delay: D,
}

impl<A: AnalogInput, D: DelayNs> ButtonReader<A, D> {
    pub const fn new(adc: A, delay: D) -> Self {
        Self { adc, delay }
    }

    pub fn release(self) -> (A, D) {
        (self.adc, self.delay)
    }
}

impl<A: AnalogInput, D: DelayNs> Keypad for ButtonReader<A, D> {
    fn read_button(&mut self) -> Button {
        let button = match self.adc.read_raw() {
            Ok(raw) => Button::from_level(raw),
            Err(e) => {
                error!("keypad: ADC read failed: {:?}", e);
                Button::None
            }
        };

        if button.is_pressed() {
            self.delay.delay_ms(DEBOUNCE_MS);
        }

        button
    }
}

//! One-shot ADC1 channels shared between the sensor and keypad inputs.

use core::cell::RefCell;

use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcChannel, AdcPin};
use esp_hal::peripherals::ADC1;
use log::error;

use thermograph_core::sensors::{ADC_MAX, AnalogInput, SensorError};

/// ADC1 in blocking mode, borrowed by every [`AdcInput`].
pub type SharedAdc<'d> = RefCell<Adc<'d, ADC1<'d>, Blocking>>;

/// The S3 converts with 12 bits; the core expects 10-bit counts.
const RESOLUTION_SHIFT: u32 = 2;

/// A single analog pin on the shared ADC1.
pub struct AdcInput<'a, 'd, PIN> {
    adc: &'a SharedAdc<'d>,
    pin: AdcPin<PIN, ADC1<'d>>,
}

impl<'a, 'd, PIN: AdcChannel> AdcInput<'a, 'd, PIN> {
    pub fn new(adc: &'a SharedAdc<'d>, pin: AdcPin<PIN, ADC1<'d>>) -> Self {
        Self { adc, pin }
    }
}

impl<PIN: AdcChannel> AnalogInput for AdcInput<'_, '_, PIN> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let Ok(mut adc) = self.adc.try_borrow_mut() else {
            error!("adc: converter busy");
            return Err(SensorError::AdcRead);
        };
        let raw = nb::block!(adc.read_oneshot(&mut self.pin)).map_err(|()| SensorError::AdcRead)?;
        Ok((raw >> RESOLUTION_SHIFT).min(ADC_MAX))
    }
}

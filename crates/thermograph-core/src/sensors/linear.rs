//! LM35-style linear analog temperature sensor (10 mV/°C).

use log::{error, info};

use super::{AnalogInput, Reading};

/// ADC reference the sensor is sampled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// 5 V supply reference, 1024 steps.
    Vcc5,
    /// 1.1 V internal reference, roughly 9.31 counts per degree.
    Internal1V1,
}

impl Reference {
    pub fn to_celsius(self, raw: u16) -> f32 {
        let raw = f32::from(raw);
        match self {
            Reference::Vcc5 => 5.0 * raw * 100.0 / 1024.0,
            Reference::Internal1V1 => raw / 9.31,
        }
    }
}

pub struct LinearNode<A> {
    adc: A,
    reference: Reference,
}

impl<A: AnalogInput> LinearNode<A> {
    pub const fn new(adc: A, reference: Reference) -> Self {
        Self { adc, reference }
    }

    pub fn init(&mut self) {
        info!("lm35: using {:?} reference", self.reference);
    }

    pub fn sample(&mut self) -> Reading {
        match self.adc.read_raw() {
            Ok(raw) => Reading::temperature(self.reference.to_celsius(raw)),
            Err(e) => {
                error!("lm35: {}", e);
                Reading::EMPTY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorError;
    use crate::sensors::testing::ScriptedAdc;

    #[test]
    fn vcc_reference_scale() {
        // 48 counts * 5 V / 1024 = 234 mV
        let t = Reference::Vcc5.to_celsius(48);
        assert!((t - 23.4375).abs() < 1e-4);
    }

    #[test]
    fn internal_reference_scale() {
        assert_eq!(Reference::Internal1V1.to_celsius(0), 0.0);
        let t = Reference::Internal1V1.to_celsius(214);
        assert!((t - 22.986).abs() < 1e-2);
    }

    #[test]
    fn adc_error_is_absent() {
        let mut node = LinearNode::new(
            ScriptedAdc::new(&[Err(SensorError::AdcRead)]),
            Reference::Vcc5,
        );
        assert_eq!(node.sample(), Reading::EMPTY);
    }
}

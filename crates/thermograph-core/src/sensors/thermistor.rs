//! NTC thermistor on a voltage divider.
//!
//! The thermistor sits on the low side of a divider with a fixed 1 kΩ
//! resistor. The ADC fraction gives the thermistor resistance, which is
//! normalised to its 25 °C value and interpolated over the datasheet
//! resistance/temperature table.

use log::error;

use super::{ADC_MAX, AnalogInput, Reading};

/// Fixed divider resistor, in ohms.
pub const DIVIDER_OHMS: f32 = 1_000.0;

/// Thermistor resistance at 25 °C, in ohms.
pub const NOMINAL_OHMS: f32 = 10_000.0;

/// `(temperature °C, R/R25)` pairs. Ratio strictly descending.
pub const CALIBRATION: [(f32, f32); 23] = [
    (-55.0, 121.46),
    (-50.0, 84.439),
    (-45.0, 59.243),
    (-40.0, 41.938),
    (-35.0, 29.947),
    (-30.0, 21.567),
    (-25.0, 15.641),
    (-20.0, 11.466),
    (-15.0, 8.451),
    (-10.0, 6.2927),
    (-5.0, 4.7077),
    (0.0, 3.5563),
    (5.0, 2.7119),
    (10.0, 2.086),
    (15.0, 1.6204),
    (20.0, 1.2683),
    (25.0, 1.0),
    (30.0, 0.7942),
    (35.0, 0.63268),
    (40.0, 0.5074),
    (45.0, 0.41026),
    (50.0, 0.33363),
    (55.0, 0.27243),
];

/// Resistance ratio `R/R25` for a raw ADC sample. `None` for a zero sample.
pub fn resistance_ratio(raw: u16) -> Option<f32> {
    if raw == 0 {
        return None;
    }
    let a = f32::from(raw) / f32::from(ADC_MAX);
    Some(DIVIDER_OHMS * (1.0 - a) / a / NOMINAL_OHMS)
}

/// Interpolate the temperature for a resistance ratio.
///
/// Returns `None` outside the calibration range. Table ratios map exactly to
/// their table temperature.
pub fn ratio_to_celsius(ratio: f32) -> Option<f32> {
    let (_, first) = CALIBRATION[0];
    if ratio > first {
        return None;
    }

    let i = (1..CALIBRATION.len()).find(|&i| CALIBRATION[i].1 <= ratio)?;
    let (t1, r1) = CALIBRATION[i - 1];
    let (t2, r2) = CALIBRATION[i];

    let fraction = (ratio - r1) / (r2 - r1);
    Some(t1 + fraction * (t2 - t1))
}

pub struct ThermistorNode<A> {
    adc: A,
}

impl<A: AnalogInput> ThermistorNode<A> {
    pub const fn new(adc: A) -> Self {
        Self { adc }
    }

    pub fn sample(&mut self) -> Reading {
        let raw = match self.adc.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                error!("thermistor: {}", e);
                return Reading::EMPTY;
            }
        };

        match resistance_ratio(raw).and_then(ratio_to_celsius) {
            Some(t) => Reading::temperature(t),
            None => {
                error!("thermistor: raw value {} out of calibration range", raw);
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
    fn table_points_are_exact() {
        for (t, r) in CALIBRATION {
            assert_eq!(ratio_to_celsius(r), Some(t), "ratio {}", r);
        }
    }

    #[test]
    fn interpolates_between_neighbours() {
        // Halfway between 20 °C (1.2683) and 25 °C (1.0).
        let t = ratio_to_celsius((1.2683 + 1.0) / 2.0).unwrap();
        assert!((t - 22.5).abs() < 1e-3, "{}", t);
    }

    #[test]
    fn out_of_range_is_absent() {
        assert_eq!(ratio_to_celsius(121.47), None);
        assert_eq!(ratio_to_celsius(0.27), None);
        assert_eq!(ratio_to_celsius(-1.0), None);
    }

    #[test]
    fn zero_sample_is_absent() {
        assert_eq!(resistance_ratio(0), None);
        let mut node = ThermistorNode::new(ScriptedAdc::constant(0));
        assert_eq!(node.sample(), Reading::EMPTY);
    }

    #[test]
    fn room_temperature_sample() {
        // R = R25 when the divider reads 1/11 of full scale.
        let mut node = ThermistorNode::new(ScriptedAdc::constant(93));
        let t = node.sample().temperature.unwrap();
        assert!((t - 25.0).abs() < 0.1, "{}", t);
    }

    #[test]
    fn adc_error_is_absent() {
        let mut node = ThermistorNode::new(ScriptedAdc::new(&[Err(SensorError::AdcRead)]));
        assert_eq!(node.sample(), Reading::EMPTY);
    }
}

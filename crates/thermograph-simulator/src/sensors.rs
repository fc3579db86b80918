//! Synthetic sensors driven by wall-clock time.

use std::time::Instant;

use thermograph_core::sensors::thermistor::{CALIBRATION, DIVIDER_OHMS, NOMINAL_OHMS};
use thermograph_core::sensors::{ADC_MAX, AnalogInput, HygroThermometer, SensorError};

/// Every n-th DHT read times out, to exercise the absent-value paths.
const DHT_TIMEOUT_EVERY: u32 = 25;

/// Outdoor thermistor divider, swinging a few degrees around 8 °C.
pub struct SyntheticThermistor {
    start: Instant,
}

impl SyntheticThermistor {
    pub fn new(start: Instant) -> Self {
        Self { start }
    }

    fn celsius(&self) -> f32 {
        let t = self.start.elapsed().as_secs_f32();
        8.0 + 6.0 * (t / 300.0).sin() + 0.4 * (t / 17.0).cos()
    }
}

impl AnalogInput for SyntheticThermistor {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Ok(celsius_to_raw(self.celsius()))
    }
}

/// Indoor DHT: slow temperature drift plus an independent humidity cycle.
pub struct SyntheticDht {
    start: Instant,
    reads: u32,
}

impl SyntheticDht {
    pub fn new(start: Instant) -> Self {
        Self { start, reads: 0 }
    }
}

impl HygroThermometer for SyntheticDht {
    fn read(&mut self) -> Result<(f32, f32), SensorError> {
        self.reads = self.reads.wrapping_add(1);
        if self.reads % DHT_TIMEOUT_EVERY == 0 {
            return Err(SensorError::Timeout { sensor: "dht11" });
        }

        let t = self.start.elapsed().as_secs_f32();
        let temperature = 21.5 + 1.5 * (t / 600.0).sin();
        let humidity = 45.0 + 8.0 * (t / 420.0).sin() + (t / 31.0).cos();
        Ok((humidity, temperature))
    }
}

/// ADC counts the divider would produce at `celsius`, clamped to the table.
fn celsius_to_raw(celsius: f32) -> u16 {
    let ratio = celsius_to_ratio(celsius);
    let a = 1.0 / (1.0 + ratio * NOMINAL_OHMS / DIVIDER_OHMS);
    (a * f32::from(ADC_MAX)).round() as u16
}

fn celsius_to_ratio(celsius: f32) -> f32 {
    let (first_t, first_r) = CALIBRATION[0];
    if celsius <= first_t {
        return first_r;
    }
    for pair in CALIBRATION.windows(2) {
        let ((t1, r1), (t2, r2)) = (pair[0], pair[1]);
        if celsius <= t2 {
            return r1 + (celsius - t1) / (t2 - t1) * (r2 - r1);
        }
    }
    CALIBRATION[CALIBRATION.len() - 1].1
}

//! Combined humidity/temperature sensor. Both channels or neither.

use log::error;

use super::{HygroThermometer, Reading};

pub struct CombinedNode<H> {
    device: H,
}

impl<H: HygroThermometer> CombinedNode<H> {
    pub const fn new(device: H) -> Self {
        Self { device }
    }

    pub fn init(&mut self) {
        if let Err(e) = self.device.init() {
            error!("dht: {}", e);
        }
    }

    pub fn sample(&mut self) -> Reading {
        match self.device.read() {
            Ok((humidity, temperature)) if !humidity.is_nan() && !temperature.is_nan() => {
                Reading::both(temperature, humidity)
            }
            Ok(_) => {
                error!("dht: invalid measurement");
                Reading::EMPTY
            }
            Err(e) => {
                error!("dht: {}", e);
                Reading::EMPTY
            }
        }
    }

    pub fn device(&self) -> &H {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorError;
    use crate::sensors::testing::FixedHygro;

    #[test]
    fn both_channels_present() {
        let mut node = CombinedNode::new(FixedHygro::new(Ok((40.0, 21.0))));
        node.init();
        assert!(node.device().initialized);
        assert_eq!(node.sample(), Reading::both(21.0, 40.0));
    }

    #[test]
    fn nan_in_either_channel_drops_both() {
        let mut node = CombinedNode::new(FixedHygro::new(Ok((f32::NAN, 21.0))));
        assert_eq!(node.sample(), Reading::EMPTY);

        let mut node = CombinedNode::new(FixedHygro::new(Ok((40.0, f32::NAN))));
        assert_eq!(node.sample(), Reading::EMPTY);
    }

    #[test]
    fn read_error_drops_both() {
        let mut node = CombinedNode::new(FixedHygro::new(Err(SensorError::Timeout {
            sensor: "DHT11",
        })));
        assert_eq!(node.sample(), Reading::EMPTY);
    }
}

//! Periodic polling of the indoor and outdoor sources.

use log::{debug, info};

use super::{AnalogInput, HygroThermometer, Readings, SensorId, SensorNode, TemperatureSource};
use crate::config::Config;
use crate::history::DataHistory;
use crate::time::SysTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPolicy {
    /// Poll only when the sensor period has elapsed.
    Scheduled,
    /// Poll now.
    Force,
}

pub struct SensorService<A, H> {
    outdoor: TemperatureSource<A, H>,
    indoor: TemperatureSource<A, H>,
    readings: Readings,
    period_ms: u32,
    last_poll_ms: Option<u64>,
}

impl<A: AnalogInput, H: HygroThermometer> SensorService<A, H> {
    pub fn new(
        outdoor: TemperatureSource<A, H>,
        indoor: TemperatureSource<A, H>,
        period_ms: u32,
    ) -> Self {
        Self {
            outdoor,
            indoor,
            readings: Readings::new(),
            period_ms,
            last_poll_ms: None,
        }
    }

    /// Wrap both nodes, adding the smoothing filter when the config enables it.
    pub fn from_config(
        outdoor: SensorNode<A, H>,
        indoor: SensorNode<A, H>,
        config: &Config,
    ) -> Self {
        let source = |node: SensorNode<A, H>| {
            if config.enable_filter {
                TemperatureSource::filtered(node, config.filter_delta)
            } else {
                TemperatureSource::new(node)
            }
        };
        Self::new(source(outdoor), source(indoor), config.sensor_period_ms)
    }

    pub fn init(&mut self) {
        self.outdoor.init();
        self.indoor.init();
        info!("sensor_service: initialized, period {} ms", self.period_ms);
    }

    /// Sample both sources if due. Returns whether a poll happened.
    pub fn poll(&mut self, policy: PollPolicy, now: SysTime, history: &mut DataHistory) -> bool {
        let now_ms = now.total_millis();
        let due = match (policy, self.last_poll_ms) {
            (PollPolicy::Force, _) | (PollPolicy::Scheduled, None) => true,
            (PollPolicy::Scheduled, Some(last)) => {
                now_ms.saturating_sub(last) >= u64::from(self.period_ms)
            }
        };
        if !due {
            return false;
        }
        self.last_poll_ms = Some(now_ms);

        let wall = now.wall();
        for id in SensorId::ALL {
            let source = match id {
                SensorId::Outdoor => &mut self.outdoor,
                SensorId::Indoor => &mut self.indoor,
            };
            let reading = source.sample(wall);
            self.readings.set(id, reading);

            if let Some(t) = reading.temperature {
                history.push(id, wall, t);
            }
        }

        debug!(
            "sensor_service: polled ({:?}) outdoor {:?}, indoor {:?}",
            policy,
            self.readings.get(SensorId::Outdoor),
            self.readings.get(SensorId::Indoor)
        );
        true
    }

    pub fn last_temperature(&self, id: SensorId) -> Option<f32> {
        self.readings.temperature(id)
    }

    pub fn last_humidity(&self, id: SensorId) -> Option<f32> {
        self.readings.humidity(id)
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartMode;
    use crate::sensors::testing::{FixedHygro, ScriptedAdc};
    use crate::sensors::{CombinedNode, Reading, SensorError, SensorNode, ThermistorNode};

    type TestService = SensorService<ScriptedAdc, FixedHygro>;

    fn service(outdoor_raw: &[Result<u16, SensorError>], indoor: (f32, f32)) -> TestService {
        SensorService::new(
            TemperatureSource::new(SensorNode::Thermistor(ThermistorNode::new(ScriptedAdc::new(
                outdoor_raw,
            )))),
            TemperatureSource::new(SensorNode::Combined(CombinedNode::new(FixedHygro::new(Ok(
                indoor,
            ))))),
            10_000,
        )
    }

    #[test]
    fn scheduled_poll_respects_period() {
        let mut sensors = service(&[Ok(93)], (40.0, 21.0));
        let mut history = DataHistory::new(60, ChartMode::Average);

        assert!(sensors.poll(PollPolicy::Scheduled, SysTime::from_millis(0), &mut history));
        assert!(!sensors.poll(PollPolicy::Scheduled, SysTime::from_millis(9_999), &mut history));
        assert!(sensors.poll(PollPolicy::Scheduled, SysTime::from_millis(10_000), &mut history));
        assert!(sensors.poll(PollPolicy::Force, SysTime::from_millis(10_001), &mut history));
    }

    #[test]
    fn poll_updates_cache_and_history() {
        let mut sensors = service(&[Ok(93)], (40.0, 21.0));
        let mut history = DataHistory::new(60, ChartMode::Average);
        assert_eq!(sensors.last_temperature(SensorId::Indoor), None);

        sensors.poll(PollPolicy::Force, SysTime::from_millis(0), &mut history);

        assert_eq!(sensors.readings().get(SensorId::Indoor), Reading::both(21.0, 40.0));
        assert_eq!(sensors.last_humidity(SensorId::Outdoor), None);
        let outdoor = sensors.last_temperature(SensorId::Outdoor).unwrap();
        assert!((outdoor - 25.0).abs() < 0.1);
        assert!(!history.is_empty(SensorId::Outdoor));
        assert!(!history.is_empty(SensorId::Indoor));
        assert_eq!(history.revision().value(), 2);
    }

    #[test]
    fn config_enables_filter() {
        let config = Config {
            enable_filter: true,
            ..Config::default()
        };
        let mut sensors: TestService = SensorService::from_config(
            SensorNode::Thermistor(ThermistorNode::new(ScriptedAdc::constant(93))),
            SensorNode::Combined(CombinedNode::new(FixedHygro::new(Ok((40.0, 21.0))))),
            &config,
        );
        let mut history = DataHistory::new(60, ChartMode::Average);
        sensors.poll(PollPolicy::Force, SysTime::from_millis(0), &mut history);
        assert_eq!(sensors.last_temperature(SensorId::Indoor), Some(21.0));
    }

    #[test]
    fn failed_read_clears_cache_and_skips_history() {
        let mut sensors = service(&[Ok(93), Err(SensorError::AdcRead)], (40.0, 21.0));
        let mut history = DataHistory::new(60, ChartMode::Average);

        sensors.poll(PollPolicy::Force, SysTime::from_millis(0), &mut history);
        let rev = history.revision();
        sensors.poll(PollPolicy::Force, SysTime::from_millis(120_000), &mut history);

        assert_eq!(sensors.last_temperature(SensorId::Outdoor), None);
        // Only the indoor push was accepted.
        assert_eq!(history.revision().value(), rev.value() + 1);
    }
}

//! Rolling per-sensor measurement history for the bar chart.
//!
//! Each sensor owns a fixed series of [`POINTS`] values ordered oldest to
//! newest. Writes are gated by a minimum interval so the chart spans a fixed
//! stretch of time regardless of how often the sensors are polled.

use log::debug;

use crate::config::ChartMode;
use crate::sensors::SensorId;
use crate::time::WallTime;

/// Points kept per sensor, one per bitmap column.
pub const POINTS: usize = 20;

/// Height of the chart in pixels.
pub const CHART_HEIGHT: u8 = 16;

const MID: u8 = CHART_HEIGHT / 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub value: f32,
    pub time: WallTime,
}

impl HistoryPoint {
    const ZERO: Self = Self {
        value: 0.0,
        time: WallTime::ZERO,
    };
}

/// Change counter of the whole history. Compare for inequality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revision(u32);

impl Revision {
    pub const fn value(self) -> u32 {
        self.0
    }

    fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

#[derive(Debug, Clone)]
struct Series {
    points: [HistoryPoint; POINTS],
    written: bool,
}

impl Series {
    const fn new() -> Self {
        Self {
            points: [HistoryPoint::ZERO; POINTS],
            written: false,
        }
    }

    fn newest(&self) -> &HistoryPoint {
        &self.points[POINTS - 1]
    }

    fn stats(&self) -> (f32, f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0.0f32;
        for p in &self.points {
            min = min.min(p.value);
            max = max.max(p.value);
            sum += p.value;
        }
        (min, max, sum / POINTS as f32)
    }
}

pub struct DataHistory {
    series: [Series; 2],
    revision: Revision,
    interval_secs: u32,
    mode: ChartMode,
}

impl DataHistory {
    pub const fn new(interval_secs: u32, mode: ChartMode) -> Self {
        Self {
            series: [Series::new(), Series::new()],
            revision: Revision(0),
            interval_secs,
            mode,
        }
    }

    /// Record a value. Returns `false` when the write was rejected.
    ///
    /// The first write for a sensor fills the whole series. Later writes
    /// closer than the configured interval to the newest point are dropped.
    pub fn push(&mut self, id: SensorId, time: WallTime, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }

        let series = &mut self.series[id.index()];
        let point = HistoryPoint { value, time };

        if !series.written {
            series.points = [point; POINTS];
            series.written = true;
        } else {
            let delta = time.seconds_since(series.newest().time);
            if delta < u64::from(self.interval_secs) {
                return false;
            }
            series.points.copy_within(1.., 0);
            series.points[POINTS - 1] = point;
        }

        self.revision.bump();
        debug!(
            "data_history: {:?} <- {} at {}, rev #{}",
            id,
            value,
            time,
            self.revision.value()
        );
        true
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn is_empty(&self, id: SensorId) -> bool {
        !self.series[id.index()].written
    }

    /// Stored points, oldest first. All zero before the first write.
    pub fn points(&self, id: SensorId) -> &[HistoryPoint; POINTS] {
        &self.series[id.index()].points
    }

    /// Bar heights in `0..CHART_HEIGHT`, one per point, oldest first.
    pub fn get_points(&self, id: SensorId) -> [u8; POINTS] {
        let series = &self.series[id.index()];
        let mut out = [MID; POINTS];
        if !series.written {
            return out;
        }

        let (min, max, avg) = series.stats();
        // The mean of identical values can land an ulp off them.
        let tolerance = f32::EPSILON * max.abs().max(min.abs()).max(1.0);
        if max - min <= tolerance {
            return out;
        }
        let half = f32::from(MID);

        match self.mode {
            ChartMode::Average => {
                let amp = (avg - min).max(max - avg);
                let k = (half - 1.0) / amp;
                for (y, p) in out.iter_mut().zip(series.points.iter()) {
                    let offset = (k * (p.value - avg)).clamp(-half, half - 1.0);
                    *y = clamp_height(offset as i32 + i32::from(MID));
                }
            }
            ChartMode::MinMax => {
                let range = max - min;
                let span = f32::from(CHART_HEIGHT - 2);
                for (y, p) in out.iter_mut().zip(series.points.iter()) {
                    *y = clamp_height(1 + ((p.value - min) * span / range) as i32);
                }
            }
        }

        out
    }
}

fn clamp_height(y: i32) -> u8 {
    y.clamp(0, i32::from(CHART_HEIGHT) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u64) -> WallTime {
        WallTime::from_seconds(m * 60)
    }

    #[test]
    fn first_push_fills_series() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        assert!(history.is_empty(SensorId::Outdoor));

        assert!(history.push(SensorId::Outdoor, minutes(0), 12.5));
        assert!(!history.is_empty(SensorId::Outdoor));
        assert!(history.is_empty(SensorId::Indoor));
        assert!(history.points(SensorId::Outdoor).iter().all(|p| p.value == 12.5));
        assert_eq!(history.revision().value(), 1);
        assert_eq!(history.get_points(SensorId::Outdoor), [8; POINTS]);
    }

    #[test]
    fn gated_push_is_noop() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        history.push(SensorId::Indoor, minutes(1), 20.0);
        let before = *history.points(SensorId::Indoor);

        assert!(!history.push(SensorId::Indoor, WallTime::from_seconds(119), 30.0));
        assert_eq!(*history.points(SensorId::Indoor), before);
        assert_eq!(history.revision().value(), 1);

        // Time going backwards counts as no time passed.
        assert!(!history.push(SensorId::Indoor, WallTime::ZERO, 30.0));
        assert_eq!(history.revision().value(), 1);

        assert!(history.push(SensorId::Indoor, minutes(2), 30.0));
        assert_eq!(history.revision().value(), 2);
        assert_eq!(history.points(SensorId::Indoor)[POINTS - 1].value, 30.0);
        assert_eq!(history.points(SensorId::Indoor)[POINTS - 2].value, 20.0);
    }

    #[test]
    fn revision_counts_every_accepted_push_across_sensors() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        let mut last = history.revision();
        for m in 0..5 {
            for id in SensorId::ALL {
                assert!(history.push(id, minutes(m), m as f32));
                assert_eq!(history.revision().value(), last.value() + 1);
                last = history.revision();
            }
        }
        assert_eq!(last.value(), 10);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        assert!(!history.push(SensorId::Outdoor, minutes(0), f32::NAN));
        assert!(history.is_empty(SensorId::Outdoor));
        assert_eq!(history.revision(), Revision::default());
    }

    #[test]
    fn unwritten_series_is_mid_line() {
        let history = DataHistory::new(60, ChartMode::MinMax);
        assert_eq!(history.get_points(SensorId::Indoor), [8; POINTS]);
    }

    #[test]
    fn average_normalisation_is_bounded() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        let values = [
            -3.0, 40.0, 2.5, 2.5, 17.0, 0.0, -20.0, 5.0, 5.5, 6.0, 8.0, 1.0, 3.0, 4.0, 9.0, 9.5,
            10.0, 12.0, -1.0, 7.0,
        ];
        for (m, v) in values.iter().enumerate() {
            history.push(SensorId::Outdoor, minutes(m as u64), *v);
        }
        let points = history.get_points(SensorId::Outdoor);
        assert!(points.iter().all(|y| (1..=15).contains(y)), "{:?}", points);
        // The value furthest from the average lands on the top edge.
        assert!(points[1] >= 14);
        assert!(points[6] < 8);
    }

    #[test]
    fn min_max_normalisation_spans_height() {
        let mut history = DataHistory::new(60, ChartMode::MinMax);
        for m in 0..POINTS as u64 {
            history.push(SensorId::Indoor, minutes(m), 20.0 + m as f32);
        }
        let points = history.get_points(SensorId::Indoor);
        assert_eq!(points[0], 1);
        assert_eq!(points[POINTS - 1], 15);
        assert!(points.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn flat_series_is_mid_line() {
        let mut history = DataHistory::new(60, ChartMode::MinMax);
        history.push(SensorId::Outdoor, minutes(0), 4.0);
        history.push(SensorId::Outdoor, minutes(1), 4.0);
        assert_eq!(history.get_points(SensorId::Outdoor), [8; POINTS]);
    }

    #[test]
    fn flat_series_of_inexact_values_is_mid_line() {
        for mode in [ChartMode::Average, ChartMode::MinMax] {
            for i in 0..2000 {
                let value = -50.0 + i as f32 * 0.1;
                let mut history = DataHistory::new(60, mode);
                history.push(SensorId::Outdoor, minutes(0), value);
                assert_eq!(
                    history.get_points(SensorId::Outdoor),
                    [8; POINTS],
                    "{:?} at {}",
                    mode,
                    value
                );
            }
        }
    }

    #[test]
    fn subnormal_spread_stays_in_range() {
        let mut history = DataHistory::new(0, ChartMode::Average);
        history.push(SensorId::Indoor, minutes(0), 0.0);
        history.push(SensorId::Indoor, minutes(0), 1e-39);
        let points = history.get_points(SensorId::Indoor);
        assert!(points.iter().all(|y| *y < CHART_HEIGHT), "{:?}", points);
    }

    #[test]
    fn twenty_five_minutes_of_pushes() {
        let mut history = DataHistory::new(60, ChartMode::Average);
        for n in 1..=25u64 {
            assert!(history.push(SensorId::Outdoor, minutes(n - 1), n as f32));
        }

        assert_eq!(history.revision().value(), 25);
        let values: heapless::Vec<f32, POINTS> = history
            .points(SensorId::Outdoor)
            .iter()
            .map(|p| p.value)
            .collect();
        let expected: heapless::Vec<f32, POINTS> = (6..=25).map(|n| n as f32).collect();
        assert_eq!(values, expected);

        let points = history.get_points(SensorId::Outdoor);
        assert!(points.iter().all(|y| (1..=15).contains(y)));
        assert!(points.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn revision_wraps() {
        let mut rev = Revision(u32::MAX);
        rev.bump();
        assert_eq!(rev, Revision(0));
    }
}

//! Temperature with one decimal place above the uptime clock.

use core::fmt::Write;

use log::debug;

use crate::button::Button;
use crate::display::format::{clock, tenths};
use crate::display::{CharacterLcd, DisplayError, LCD_COLUMNS};
use crate::sensors::SensorId;
use crate::time::WallTime;

use super::{MISSING, Mode, ModeContext, ModeId, padded_row, tenths_key};

#[derive(Debug, Default)]
pub struct ClockMode {
    sensor: SensorId,
    shown_temperature: Option<Option<i32>>,
    shown_time: Option<WallTime>,
}

impl ClockMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    fn render<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        let temperature = ctx.readings.temperature(self.sensor);
        let key = tenths_key(temperature);
        if self.shown_temperature != Some(key) {
            let mut text = heapless::String::<32>::new();
            let _ = match temperature {
                Some(t) => write!(text, "Temp  {}°C {}", tenths(t), self.sensor.short_name()),
                None => write!(text, "Temp  {}°C {}", MISSING, self.sensor.short_name()),
            };
            ctx.display
                .print_at(0, 0, &padded_row(&text, usize::from(LCD_COLUMNS)))?;
            self.shown_temperature = Some(key);
            debug!("clock: temperature = {:?}", key);
        }

        if self.shown_time != Some(ctx.now) {
            let mut text = heapless::String::<32>::new();
            let _ = write!(text, "Time {}", clock(ctx.now));
            ctx.display
                .print_at(0, 1, &padded_row(&text, usize::from(LCD_COLUMNS)))?;
            self.shown_time = Some(ctx.now);
        }
        Ok(())
    }
}

impl Mode for ClockMode {
    fn id(&self) -> ModeId {
        ModeId::Clock
    }

    fn title(&self) -> &'static str {
        "clock"
    }

    fn on_enter<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        self.shown_temperature = None;
        self.shown_time = None;
        ctx.display.clear()?;
        self.render(ctx)
    }

    fn tick<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        self.render(ctx)
    }

    fn handle_button<L: CharacterLcd>(
        &mut self,
        button: Button,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        if matches!(button, Button::Left | Button::Right) {
            self.sensor = self.sensor.toggled();
            self.shown_temperature = None;
        }
        self.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::Harness;
    use crate::sensors::Reading;

    #[test]
    fn shows_tenths_and_uptime() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(-3.25));
        h.now = WallTime::from_seconds(3_600 + 2 * 60 + 5);
        let mut mode = ClockMode::new();

        mode.on_enter(&mut h.ctx()).unwrap();

        assert_eq!(h.row(0).as_str(), "Temp  -3.2°C out");
        assert_eq!(h.row(1).as_str(), "Time  1:02:05   ");
    }

    #[test]
    fn long_temperature_row_is_cut_at_last_column() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(-12.5));
        let mut mode = ClockMode::new();
        let before = h.display.lcd().writes;

        mode.on_enter(&mut h.ctx()).unwrap();

        assert_eq!(h.row(0).as_str(), "Temp  -12.5°C ou");
        // Two full rows and not a byte more.
        assert_eq!(h.display.lcd().writes - before, 2 * usize::from(LCD_COLUMNS));
    }

    #[test]
    fn toggling_sensor_rewrites_whole_row() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(10.0));
        h.readings.set(SensorId::Indoor, Reading::temperature(21.5));
        let mut mode = ClockMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();

        mode.handle_button(Button::Right, &mut h.ctx()).unwrap();
        assert_eq!(mode.sensor(), SensorId::Indoor);
        assert_eq!(h.row(0).as_str(), "Temp  21.5°C in ");
    }

    #[test]
    fn clock_redraws_only_when_second_changes() {
        let mut h = Harness::new();
        let mut mode = ClockMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(h.row(0).as_str(), "Temp  --.-°C out");

        let traffic = h.lcd_traffic();
        mode.tick(&mut h.ctx()).unwrap();
        assert_eq!(h.lcd_traffic(), traffic);

        h.now = WallTime::from_seconds(1);
        mode.tick(&mut h.ctx()).unwrap();
        assert_eq!(h.row(1).as_str(), "Time  0:00:01   ");
    }
}

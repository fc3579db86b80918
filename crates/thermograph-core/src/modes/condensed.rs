//! Temperature and humidity of one sensor as two lines of text.

use core::fmt::Write;

use log::debug;

use crate::button::Button;
use crate::display::format::tenths;
use crate::display::{CharacterLcd, DisplayError, LCD_COLUMNS};
use crate::sensors::SensorId;

use super::{MISSING, Mode, ModeContext, ModeId, padded_row, tenths_key};

#[derive(Debug, Default)]
pub struct CondensedMode {
    sensor: SensorId,
    shown: Option<(Option<i32>, Option<i32>)>,
}

impl CondensedMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    fn render<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        let reading = ctx.readings.get(self.sensor);
        let key = (tenths_key(reading.temperature), tenths_key(reading.humidity));
        if self.shown == Some(key) {
            return Ok(());
        }

        let mut top = heapless::String::<32>::new();
        let _ = match reading.temperature {
            Some(t) => write!(top, "Temp  {}°C {}", tenths(t), self.sensor.short_name()),
            None => write!(top, "Temp  {}°C {}", MISSING, self.sensor.short_name()),
        };
        let mut bottom = heapless::String::<32>::new();
        let _ = match reading.humidity {
            Some(h) => write!(bottom, "Humidity  {}%", tenths(h)),
            None => write!(bottom, "Humidity  {}%", MISSING),
        };

        let width = usize::from(LCD_COLUMNS);
        ctx.display.print_at(0, 0, &padded_row(&top, width))?;
        ctx.display.print_at(0, 1, &padded_row(&bottom, width))?;

        self.shown = Some(key);
        debug!(
            "condensed: temperature = {:?}, humidity = {:?}",
            reading.temperature, reading.humidity
        );
        Ok(())
    }
}

impl Mode for CondensedMode {
    fn id(&self) -> ModeId {
        ModeId::Condensed
    }

    fn title(&self) -> &'static str {
        "condensed"
    }

    fn on_enter<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        self.shown = None;
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
        if matches!(button, Button::Up | Button::Down) {
            self.sensor = self.sensor.toggled();
        }
        self.shown = None;
        self.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::Harness;
    use crate::sensors::Reading;

    #[test]
    fn shows_both_channels() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Indoor, Reading::both(22.5, 41.0));
        let mut mode = CondensedMode::new();
        mode.handle_button(Button::Up, &mut h.ctx()).unwrap();

        assert_eq!(mode.sensor(), SensorId::Indoor);
        assert_eq!(h.row(0).as_str(), "Temp  22.5°C in ");
        assert_eq!(h.row(1).as_str(), "Humidity  41.0% ");
    }

    #[test]
    fn missing_humidity_is_dashed() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(4.0));
        let mut mode = CondensedMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();

        assert_eq!(h.row(0).as_str(), "Temp  4.0°C out ");
        assert_eq!(h.row(1).as_str(), "Humidity  --.-% ");
    }

    #[test]
    fn left_right_do_not_change_sensor() {
        let mut h = Harness::new();
        let mut mode = CondensedMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();
        mode.handle_button(Button::Left, &mut h.ctx()).unwrap();
        mode.handle_button(Button::Right, &mut h.ctx()).unwrap();
        assert_eq!(mode.sensor(), SensorId::Outdoor);
    }

    #[test]
    fn tick_redraws_on_tenths_change_only() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(4.01));
        let mut mode = CondensedMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();
        let traffic = h.lcd_traffic();

        h.readings.set(SensorId::Outdoor, Reading::temperature(4.04));
        mode.tick(&mut h.ctx()).unwrap();
        assert_eq!(h.lcd_traffic(), traffic);

        h.readings.set(SensorId::Outdoor, Reading::temperature(4.25));
        mode.tick(&mut h.ctx()).unwrap();
        assert_eq!(h.row(0).as_str(), "Temp  4.2°C out ");
    }
}

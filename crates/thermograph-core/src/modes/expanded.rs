//! One value in large bitmap digits.
//!
//! LEFT/RIGHT switch between the sensors, UP/DOWN between temperature and
//! humidity.

use log::{debug, info};

use crate::button::Button;
use crate::display::{CharacterLcd, DisplayError, Glyph};
use crate::sensors::SensorId;

use super::{Mode, ModeContext, ModeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Temperature,
    Humidity,
}

impl ValueKind {
    const fn toggled(self) -> Self {
        match self {
            Self::Temperature => Self::Humidity,
            Self::Humidity => Self::Temperature,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
        }
    }
}

/// `[tens, units, °, C]`. Values outside `0..100` show question marks.
///
/// The big-digit view has no minus sign, so negative readings are left to
/// the condensed and clock modes.
pub fn temperature_glyphs(value: Option<f32>) -> [Glyph; 4] {
    match value {
        Some(t) => {
            let t = t as i32;
            [
                Glyph::digit(t / 10),
                Glyph::digit(t % 10),
                Glyph::Degree,
                Glyph::Celsius,
            ]
        }
        None => [Glyph::Question, Glyph::Question, Glyph::Degree, Glyph::Celsius],
    }
}

/// `[hundreds, tens, units, %]` with a leading zero blanked.
pub fn humidity_glyphs(value: Option<f32>) -> [Glyph; 4] {
    match value {
        Some(h) => {
            let h = h as i32;
            let hundreds = match Glyph::digit(h / 100) {
                Glyph::Digit(0) => Glyph::Blank,
                glyph => glyph,
            };
            let rest = h % 100;
            [
                hundreds,
                Glyph::digit(rest / 10),
                Glyph::digit(rest % 10),
                Glyph::Percent,
            ]
        }
        None => [
            Glyph::Question,
            Glyph::Question,
            Glyph::Question,
            Glyph::Percent,
        ],
    }
}

#[derive(Debug, Default)]
pub struct ExpandedMode {
    sensor: SensorId,
    value: ValueKind,
    /// Whole-unit value last drawn. `None` until the first draw.
    shown: Option<Option<i32>>,
}

impl ExpandedMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    pub fn value_kind(&self) -> ValueKind {
        self.value
    }

    fn render<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        let value = match self.value {
            ValueKind::Temperature => ctx.readings.temperature(self.sensor),
            ValueKind::Humidity => ctx.readings.humidity(self.sensor),
        };
        let key = value.map(|v| v as i32);
        if self.shown == Some(key) {
            return Ok(());
        }

        let glyphs = match self.value {
            ValueKind::Temperature => temperature_glyphs(value),
            ValueKind::Humidity => humidity_glyphs(value),
        };

        ctx.display.clear()?;
        ctx.display.graphics().clear();
        ctx.display.print_glyphs(glyphs)?;
        ctx.display.print_at(0, 0, self.value.label())?;
        ctx.display.print_at(0, 1, self.sensor.name())?;

        self.shown = Some(key);
        debug!("expanded: {:?} {:?} = {:?}", self.sensor, self.value, key);
        Ok(())
    }
}

impl Mode for ExpandedMode {
    fn id(&self) -> ModeId {
        ModeId::Expanded
    }

    fn title(&self) -> &'static str {
        "expanded"
    }

    fn on_enter<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        self.shown = None;
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
        match button {
            Button::Left | Button::Right => self.sensor = self.sensor.toggled(),
            Button::Up | Button::Down => self.value = self.value.toggled(),
            _ => return Ok(()),
        }
        info!(
            "expanded: active sensor {:?}, active value {:?}",
            self.sensor, self.value
        );
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
    fn glyph_builders() {
        assert_eq!(
            temperature_glyphs(Some(23.7)),
            [Glyph::Digit(2), Glyph::Digit(3), Glyph::Degree, Glyph::Celsius]
        );
        assert_eq!(
            temperature_glyphs(None),
            [Glyph::Question, Glyph::Question, Glyph::Degree, Glyph::Celsius]
        );
        assert_eq!(
            temperature_glyphs(Some(-4.0)),
            [Glyph::Digit(0), Glyph::Question, Glyph::Degree, Glyph::Celsius]
        );
        assert_eq!(
            humidity_glyphs(Some(45.2)),
            [Glyph::Blank, Glyph::Digit(4), Glyph::Digit(5), Glyph::Percent]
        );
        assert_eq!(
            humidity_glyphs(Some(100.0)),
            [Glyph::Digit(1), Glyph::Digit(0), Glyph::Digit(0), Glyph::Percent]
        );
    }

    #[test]
    fn enter_draws_outdoor_temperature() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(12.0));
        let mut mode = ExpandedMode::new();

        mode.on_enter(&mut h.ctx()).unwrap();

        assert_eq!(h.row(0).as_str(), "Temperature 0123");
        assert_eq!(h.row(1).as_str(), "outside     4567");
    }

    #[test]
    fn tick_without_change_does_not_redraw() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Outdoor, Reading::temperature(12.0));
        let mut mode = ExpandedMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();

        let traffic = h.lcd_traffic();
        h.readings.set(SensorId::Outdoor, Reading::temperature(12.9));
        mode.tick(&mut h.ctx()).unwrap();
        assert_eq!(h.lcd_traffic(), traffic);

        h.readings.set(SensorId::Outdoor, Reading::temperature(13.1));
        mode.tick(&mut h.ctx()).unwrap();
        assert!(h.lcd_traffic() > traffic);
    }

    #[test]
    fn buttons_toggle_sensor_and_value() {
        let mut h = Harness::new();
        h.readings.set(SensorId::Indoor, Reading::both(21.0, 40.0));
        let mut mode = ExpandedMode::new();
        mode.on_enter(&mut h.ctx()).unwrap();

        mode.handle_button(Button::Right, &mut h.ctx()).unwrap();
        assert_eq!(mode.sensor(), SensorId::Indoor);
        assert_eq!(h.row(1).as_str(), "in the room 4567");

        mode.handle_button(Button::Down, &mut h.ctx()).unwrap();
        assert_eq!(mode.value_kind(), ValueKind::Humidity);
        assert_eq!(h.row(0).as_str(), "Humidity    0123");

        mode.handle_button(Button::Left, &mut h.ctx()).unwrap();
        assert_eq!(mode.sensor(), SensorId::Outdoor);
        mode.handle_button(Button::Up, &mut h.ctx()).unwrap();
        assert_eq!(mode.value_kind(), ValueKind::Temperature);
    }
}

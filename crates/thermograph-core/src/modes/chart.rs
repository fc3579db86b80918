//! Bar chart of the temperature history of one sensor.

use log::debug;

use crate::button::Button;
use crate::display::{CharacterLcd, DisplayError};
use crate::history::Revision;
use crate::sensors::SensorId;

use super::{Mode, ModeContext, ModeId, padded_row};

/// Widest sensor label, `[outside]`.
const LABEL_WIDTH: usize = 9;

#[derive(Debug, Default)]
pub struct TemperatureChartMode {
    sensor: SensorId,
    /// History revision of the chart on screen.
    drawn: Option<Revision>,
}

impl TemperatureChartMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    fn render<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        let revision = ctx.history.revision();
        if self.drawn == Some(revision) {
            return Ok(());
        }

        let points = ctx.history.get_points(self.sensor);
        ctx.display.graphics().bar_graph(&points);
        ctx.display.flush_graphics()?;

        ctx.display.print_at(0, 0, "Temp chart")?;
        ctx.display
            .print_at(0, 1, &padded_row(self.sensor.chart_label(), LABEL_WIDTH))?;

        self.drawn = Some(revision);
        debug!("chart: {:?} rev #{}", self.sensor, revision.value());
        Ok(())
    }
}

impl Mode for TemperatureChartMode {
    fn id(&self) -> ModeId {
        ModeId::Chart
    }

    fn title(&self) -> &'static str {
        "chart"
    }

    fn on_enter<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        self.drawn = None;
        ctx.display.clear()?;
        ctx.display.graphics().clear();
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
            self.drawn = None;
        }
        self.render(ctx)
    }
}

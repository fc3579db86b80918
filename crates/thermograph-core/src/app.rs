//! Application root: owns every component and runs the polling loop.

use log::{error, info};
use thiserror_no_std::Error;

use crate::button::Keypad;
use crate::config::Config;
use crate::display::{CharacterLcd, Display, DisplayError};
use crate::history::DataHistory;
use crate::modes::{ModeContext, ModeEvent, ModeId, ModeManager};
use crate::sensors::{AnalogInput, HygroThermometer, PollPolicy, SensorService};
use crate::time::{Clock, TimeService};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),
}

pub struct App<L, A, H, K, C> {
    display: Display<L>,
    sensors: SensorService<A, H>,
    history: DataHistory,
    keypad: K,
    time: TimeService<C>,
    modes: ModeManager,
}

impl<L, A, H, K, C> App<L, A, H, K, C>
where
    L: CharacterLcd,
    A: AnalogInput,
    H: HygroThermometer,
    K: Keypad,
    C: Clock,
{
    pub fn new(
        config: Config,
        display: Display<L>,
        sensors: SensorService<A, H>,
        keypad: K,
        clock: C,
    ) -> Self {
        Self {
            history: DataHistory::new(config.history_interval_secs, config.chart_mode),
            display,
            sensors,
            keypad,
            time: TimeService::new(clock),
            modes: ModeManager::new(),
        }
    }

    /// Initialise the hardware, take a first reading and show the first mode.
    pub fn start(&mut self) -> Result<(), AppError> {
        info!("app: boot");
        self.display.init()?;
        self.sensors.init();

        let now = self.time.now_precise();
        self.sensors.poll(PollPolicy::Force, now, &mut self.history);

        let mut ctx = ModeContext {
            display: &mut self.display,
            readings: self.sensors.readings(),
            history: &self.history,
            now: now.wall(),
        };
        self.modes.enter_initial(&mut ctx)?;
        info!("app: started");
        Ok(())
    }

    /// One loop iteration: scheduled poll, one button, mode dispatch.
    pub fn step(&mut self) -> Result<ModeEvent, AppError> {
        let now = self.time.now_precise();
        self.sensors.poll(PollPolicy::Scheduled, now, &mut self.history);

        let button = self.keypad.read_button();

        let mut ctx = ModeContext {
            display: &mut self.display,
            readings: self.sensors.readings(),
            history: &self.history,
            now: self.time.now(),
        };
        let event = self.modes.dispatch(button, &mut ctx)?;
        if event == ModeEvent::SwitchMode {
            self.modes.switch_next(&mut ctx)?;
        }
        Ok(event)
    }

    /// Run forever. A failed frame is logged and the loop carries on.
    pub fn run(&mut self) -> ! {
        if let Err(e) = self.start() {
            error!("app: start failed: {}", e);
        }
        loop {
            if let Err(e) = self.step() {
                error!("app: {}", e);
            }
        }
    }

    pub fn display(&self) -> &Display<L> {
        &self.display
    }

    pub fn sensors(&self) -> &SensorService<A, H> {
        &self.sensors
    }

    pub fn history(&self) -> &DataHistory {
        &self.history
    }

    pub fn current_mode(&self) -> Option<ModeId> {
        self.modes.current_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Button;
    use crate::display::testing::FakeLcd;
    use crate::sensors::testing::{FixedHygro, ScriptedAdc};
    use crate::sensors::{CombinedNode, SensorId, SensorNode, TemperatureSource, ThermistorNode};
    use crate::time::ManualClock;

    struct ScriptedKeypad {
        presses: heapless::Deque<Button, 16>,
    }

    impl ScriptedKeypad {
        fn new(presses: &[Button]) -> Self {
            let mut queue = heapless::Deque::new();
            for &b in presses {
                queue.push_back(b).unwrap();
            }
            Self { presses: queue }
        }
    }

    impl Keypad for ScriptedKeypad {
        fn read_button(&mut self) -> Button {
            self.presses.pop_front().unwrap_or(Button::None)
        }
    }

    type TestApp<'c> = App<FakeLcd, ScriptedAdc, FixedHygro, ScriptedKeypad, &'c ManualClock>;

    fn app<'c>(clock: &'c ManualClock, presses: &[Button]) -> TestApp<'c> {
        let config = Config::default();
        let sensors = SensorService::new(
            TemperatureSource::new(SensorNode::Thermistor(ThermistorNode::new(
                ScriptedAdc::constant(93),
            ))),
            TemperatureSource::new(SensorNode::Combined(CombinedNode::new(FixedHygro::new(
                Ok((40.0, 21.0)),
            )))),
            config.sensor_period_ms,
        );
        App::new(
            config,
            Display::new(FakeLcd::new(), config.bitmap_column, config.bitmap_row),
            sensors,
            ScriptedKeypad::new(presses),
            clock,
        )
    }

    #[test]
    fn start_polls_and_shows_first_mode() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock, &[]);
        app.start().unwrap();

        assert_eq!(app.current_mode(), Some(ModeId::Expanded));
        assert_eq!(app.display().lcd().row(0).as_str(), "Temperature 0123");
        assert!(app.sensors().last_temperature(SensorId::Outdoor).is_some());
        assert_eq!(app.history().revision().value(), 2);
    }

    #[test]
    fn select_switches_mode_in_order() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock, &[Button::Select, Button::None, Button::Select]);
        app.start().unwrap();

        assert_eq!(app.step().unwrap(), ModeEvent::SwitchMode);
        assert_eq!(app.current_mode(), Some(ModeId::Clock));
        assert_eq!(app.step().unwrap(), ModeEvent::None);
        assert_eq!(app.current_mode(), Some(ModeId::Clock));
        app.step().unwrap();
        assert_eq!(app.current_mode(), Some(ModeId::Condensed));
        assert_eq!(app.display().lcd().row(1).as_str(), "Humidity  --.-% ");
    }

    #[test]
    fn scheduled_polls_feed_history_once_per_interval() {
        let clock = ManualClock::new(0);
        let mut app = app(&clock, &[]);
        app.start().unwrap();

        // Polls every 10 s, history accepts one point per sensor per minute.
        for _ in 0..12 {
            clock.advance(10_000);
            app.step().unwrap();
        }
        assert_eq!(app.history().revision().value(), 2 + 2 * 2);
    }
}

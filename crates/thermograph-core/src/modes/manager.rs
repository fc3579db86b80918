//! Mode manager with cyclic switching and button dispatch.

use heapless::Vec;
use log::{debug, info};

use crate::button::Button;
use crate::display::{CharacterLcd, DisplayError};

use super::{
    ClockMode, CondensedMode, ExpandedMode, Mode, ModeContext, ModeEvent, ModeId, ModeWrapper,
    TemperatureChartMode,
};

const MAX_MODES: usize = 4;

/// Owns every mode and routes buttons to the active one.
pub struct ModeManager {
    modes: Vec<ModeWrapper, MAX_MODES>,
    current: usize,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    /// All modes in switching order, starting at the expanded view.
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.register(ModeWrapper::Expanded(ExpandedMode::new()));
        manager.register(ModeWrapper::Clock(ClockMode::new()));
        manager.register(ModeWrapper::Condensed(CondensedMode::new()));
        manager.register(ModeWrapper::Chart(TemperatureChartMode::new()));
        manager
    }

    pub fn empty() -> Self {
        Self {
            modes: Vec::new(),
            current: 0,
        }
    }

    /// Append a mode to the switching order.
    pub fn register(&mut self, mode: ModeWrapper) {
        self.modes.push(mode).ok();
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn current_id(&self) -> Option<ModeId> {
        self.modes.get(self.current).map(Mode::id)
    }

    /// Activate the first mode.
    pub fn enter_initial<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        self.current = 0;
        match self.modes.get_mut(0) {
            Some(mode) => {
                info!("modes: entering {}", mode.title());
                mode.on_enter(ctx)
            }
            None => Ok(()),
        }
    }

    /// Route one button to the active mode. SELECT is never forwarded.
    pub fn dispatch<L: CharacterLcd>(
        &mut self,
        button: Button,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<ModeEvent, DisplayError> {
        let Some(mode) = self.modes.get_mut(self.current) else {
            return Ok(ModeEvent::None);
        };

        match button {
            Button::Select => return Ok(ModeEvent::SwitchMode),
            Button::None => mode.tick(ctx)?,
            other => {
                debug!("modes: {:?} -> {}", other, mode.title());
                mode.handle_button(other, ctx)?
            }
        }
        Ok(ModeEvent::None)
    }

    /// Leave the active mode and enter the next one, wrapping at the end.
    pub fn switch_next<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        if self.modes.is_empty() {
            return Ok(());
        }
        if let Some(mode) = self.modes.get_mut(self.current) {
            mode.on_exit();
        }

        self.current = (self.current + 1) % self.modes.len();
        info!("modes: switched to #{}", self.current);

        match self.modes.get_mut(self.current) {
            Some(mode) => mode.on_enter(ctx),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::Harness;

    #[test]
    fn starts_at_expanded() {
        let mut h = Harness::new();
        let mut modes = ModeManager::new();
        modes.enter_initial(&mut h.ctx()).unwrap();
        assert_eq!(modes.len(), 4);
        assert_eq!(modes.current_id(), Some(ModeId::Expanded));
        assert_eq!(&h.row(0)[..11], "Temperature");
    }

    #[test]
    fn select_cycles_and_wraps() {
        let mut h = Harness::new();
        let mut modes = ModeManager::new();
        modes.enter_initial(&mut h.ctx()).unwrap();

        let order = [
            ModeId::Clock,
            ModeId::Condensed,
            ModeId::Chart,
            ModeId::Expanded,
            ModeId::Clock,
        ];
        for expected in order {
            let event = modes.dispatch(Button::Select, &mut h.ctx()).unwrap();
            assert_eq!(event, ModeEvent::SwitchMode);
            modes.switch_next(&mut h.ctx()).unwrap();
            assert_eq!(modes.current_id(), Some(expected));
        }
    }

    #[test]
    fn other_buttons_never_switch() {
        let mut h = Harness::new();
        let mut modes = ModeManager::new();
        modes.enter_initial(&mut h.ctx()).unwrap();

        for button in [
            Button::None,
            Button::Left,
            Button::Right,
            Button::Up,
            Button::Down,
        ] {
            let event = modes.dispatch(button, &mut h.ctx()).unwrap();
            assert_eq!(event, ModeEvent::None);
            assert_eq!(modes.current_id(), Some(ModeId::Expanded));
        }
    }

    #[test]
    fn empty_manager_is_inert() {
        let mut h = Harness::new();
        let mut modes = ModeManager::empty();
        modes.enter_initial(&mut h.ctx()).unwrap();
        modes.switch_next(&mut h.ctx()).unwrap();
        assert_eq!(modes.current_id(), None);
        assert_eq!(
            modes.dispatch(Button::Select, &mut h.ctx()).unwrap(),
            ModeEvent::None
        );
    }
}

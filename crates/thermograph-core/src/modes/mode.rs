//! Core mode abstraction and the enum wrapper used by [`ModeManager`].
//!
//! [`ModeWrapper`] stores one of the concrete modes and delegates every
//! [`Mode`] method with a `match`, so the manager can keep a heterogeneous
//! list without trait objects.
//!
//! [`ModeManager`]: super::manager::ModeManager

use crate::button::Button;
use crate::display::{CharacterLcd, DisplayError};

use super::{
    ClockMode, CondensedMode, ExpandedMode, ModeContext, ModeId, TemperatureChartMode,
};

// ---------------------------------------------------------------------------
// Mode trait
// ---------------------------------------------------------------------------

/// Contract of a display mode.
///
/// The manager calls, in order:
///
/// 1. **`on_enter`** once when the mode becomes active; it resets the
///    change-suppression caches and draws the full screen.
/// 2. **`tick`** when no button is pressed; redraws only what changed.
/// 3. **`handle_button`** for any button other than SELECT.
/// 4. **`on_exit`** once when SELECT moves on to the next mode.
pub trait Mode {
    fn id(&self) -> ModeId;

    /// Short name for log lines.
    fn title(&self) -> &'static str;

    fn on_enter<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>)
    -> Result<(), DisplayError>;

    fn on_exit(&mut self) {}

    fn tick<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError>;

    fn handle_button<L: CharacterLcd>(
        &mut self,
        button: Button,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError>;
}

// ---------------------------------------------------------------------------
// ModeWrapper
// ---------------------------------------------------------------------------

/// Enum-based wrapper that stores one of the concrete modes.
///
/// When adding a mode, add a variant here and extend the delegation below.
pub enum ModeWrapper {
    Expanded(ExpandedMode),
    Clock(ClockMode),
    Condensed(CondensedMode),
    Chart(TemperatureChartMode),
}

impl Mode for ModeWrapper {
    fn id(&self) -> ModeId {
        match self {
            ModeWrapper::Expanded(mode) => mode.id(),
            ModeWrapper::Clock(mode) => mode.id(),
            ModeWrapper::Condensed(mode) => mode.id(),
            ModeWrapper::Chart(mode) => mode.id(),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ModeWrapper::Expanded(mode) => mode.title(),
            ModeWrapper::Clock(mode) => mode.title(),
            ModeWrapper::Condensed(mode) => mode.title(),
            ModeWrapper::Chart(mode) => mode.title(),
        }
    }

    fn on_enter<L: CharacterLcd>(
        &mut self,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        match self {
            ModeWrapper::Expanded(mode) => mode.on_enter(ctx),
            ModeWrapper::Clock(mode) => mode.on_enter(ctx),
            ModeWrapper::Condensed(mode) => mode.on_enter(ctx),
            ModeWrapper::Chart(mode) => mode.on_enter(ctx),
        }
    }

    fn on_exit(&mut self) {
        match self {
            ModeWrapper::Expanded(mode) => mode.on_exit(),
            ModeWrapper::Clock(mode) => mode.on_exit(),
            ModeWrapper::Condensed(mode) => mode.on_exit(),
            ModeWrapper::Chart(mode) => mode.on_exit(),
        }
    }

    fn tick<L: CharacterLcd>(&mut self, ctx: &mut ModeContext<'_, L>) -> Result<(), DisplayError> {
        match self {
            ModeWrapper::Expanded(mode) => mode.tick(ctx),
            ModeWrapper::Clock(mode) => mode.tick(ctx),
            ModeWrapper::Condensed(mode) => mode.tick(ctx),
            ModeWrapper::Chart(mode) => mode.tick(ctx),
        }
    }

    fn handle_button<L: CharacterLcd>(
        &mut self,
        button: Button,
        ctx: &mut ModeContext<'_, L>,
    ) -> Result<(), DisplayError> {
        match self {
            ModeWrapper::Expanded(mode) => mode.handle_button(button, ctx),
            ModeWrapper::Clock(mode) => mode.handle_button(button, ctx),
            ModeWrapper::Condensed(mode) => mode.handle_button(button, ctx),
            ModeWrapper::Chart(mode) => mode.handle_button(button, ctx),
        }
    }
}

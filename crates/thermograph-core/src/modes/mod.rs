//! Display modes and the state machine cycling through them.
//!
//! Exactly one mode is active. SELECT advances to the next mode (wrapping);
//! the other buttons change mode-local state such as the sensor shown.

pub mod chart;
pub mod clock;
pub mod condensed;
pub mod expanded;
pub mod manager;
pub mod mode;

use core::fmt::Write;

use crate::display::Display;
use crate::history::DataHistory;
use crate::sensors::Readings;
use crate::time::WallTime;

pub use chart::TemperatureChartMode;
pub use clock::ClockMode;
pub use condensed::CondensedMode;
pub use expanded::ExpandedMode;
pub use manager::ModeManager;
pub use mode::{Mode, ModeWrapper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeId {
    Expanded,
    Clock,
    Condensed,
    Chart,
}

/// Result of handing a button to the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    None,
    SwitchMode,
}

/// Everything a mode may read or draw on during one step.
pub struct ModeContext<'a, L> {
    pub display: &'a mut Display<L>,
    pub readings: &'a Readings,
    pub history: &'a DataHistory,
    pub now: WallTime,
}

/// Text placeholder for an absent value.
pub(crate) const MISSING: &str = "--.-";

/// `text` left aligned in exactly `width` columns, cut or space padded.
pub(crate) fn padded_row(text: &str, width: usize) -> heapless::String<32> {
    let mut row = heapless::String::new();
    let _ = write!(row, "{:<width$.width$}", text, width = width);
    row
}

/// Value in tenths of a unit, used as a change-detection key.
pub(crate) fn tenths_key(value: Option<f32>) -> Option<i32> {
    value.map(|v| (v * 10.0) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_row_fills_and_cuts_by_character() {
        assert_eq!(padded_row("ab", 4).as_str(), "ab  ");
        assert_eq!(padded_row("21.5°C in", 6).as_str(), "21.5°C");
        assert_eq!(padded_row("", 3).as_str(), "   ");
    }
}

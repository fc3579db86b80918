//! Runtime configuration.
//!
//! Everything that used to be a compile-time switch on the device (filter
//! on/off, chart normalisation, debug logging) lives here and is handed to the
//! application root at startup.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Default sensor polling period (10 seconds).
pub const DEFAULT_SENSOR_PERIOD_MS: u32 = 10_000;

/// Default minimum spacing between two history points (1 minute).
pub const DEFAULT_HISTORY_INTERVAL_SECS: u32 = 60;

/// Default smoothing filter hysteresis, in degrees Celsius.
pub const DEFAULT_FILTER_DELTA: f32 = 1.0;

/// Default LCD column of the custom character bitmap.
pub const DEFAULT_BITMAP_COLUMN: u8 = 12;

/// How history points are scaled onto the bitmap height.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// Centre the chart on the series average.
    #[default]
    Average,
    /// Stretch the series between its minimum and maximum.
    MinMax,
}

/// Log verbosity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown configuration key: {key}")]
    UnknownKey { key: heapless::String<32> },
    #[error("Invalid value for {key}")]
    InvalidValue { key: &'static str },
}

impl FromStr for ChartMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("average") || s.eq_ignore_ascii_case("avg") {
            Ok(Self::Average)
        } else if s.eq_ignore_ascii_case("min_max") || s.eq_ignore_ascii_case("minmax") {
            Ok(Self::MinMax)
        } else {
            Err(ConfigError::InvalidValue { key: "chart_mode" })
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else {
            Err(ConfigError::InvalidValue { key: "log_level" })
        }
    }
}

/// Application configuration supplied at startup.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Run temperature readings through the smoothing filter.
    pub enable_filter: bool,
    pub chart_mode: ChartMode,
    pub log_level: LogLevel,
    /// Minimum time between two scheduled sensor polls.
    pub sensor_period_ms: u32,
    /// Minimum time between two accepted history points.
    pub history_interval_secs: u32,
    /// Smoothing filter hysteresis.
    pub filter_delta: f32,
    /// Position of the custom character bitmap on the LCD.
    pub bitmap_column: u8,
    pub bitmap_row: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_filter: false,
            chart_mode: ChartMode::Average,
            log_level: LogLevel::Info,
            sensor_period_ms: DEFAULT_SENSOR_PERIOD_MS,
            history_interval_secs: DEFAULT_HISTORY_INTERVAL_SECS,
            filter_delta: DEFAULT_FILTER_DELTA,
            bitmap_column: DEFAULT_BITMAP_COLUMN,
            bitmap_row: 0,
        }
    }
}

impl Config {
    /// Apply a single `key = value` setting.
    ///
    /// Keys are matched case-insensitively and may carry a `THERMOGRAPH_`
    /// prefix, so binaries can feed environment variables straight in.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let name = strip_prefix_ignore_case(key, "THERMOGRAPH_");
        let value = value.trim();

        if name.eq_ignore_ascii_case("enable_filter") {
            self.enable_filter = parse_bool(value).ok_or(ConfigError::InvalidValue {
                key: "enable_filter",
            })?;
        } else if name.eq_ignore_ascii_case("chart_mode") {
            self.chart_mode = value.parse()?;
        } else if name.eq_ignore_ascii_case("log_level") {
            self.log_level = value.parse()?;
        } else if name.eq_ignore_ascii_case("sensor_period_ms") {
            self.sensor_period_ms = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "sensor_period_ms",
            })?;
        } else if name.eq_ignore_ascii_case("history_interval_secs") {
            self.history_interval_secs =
                value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "history_interval_secs",
                })?;
        } else if name.eq_ignore_ascii_case("filter_delta") {
            self.filter_delta = value
                .parse::<f32>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or(ConfigError::InvalidValue {
                    key: "filter_delta",
                })?;
        } else if name.eq_ignore_ascii_case("bitmap_column") {
            self.bitmap_column = value
                .parse::<u8>()
                .ok()
                .filter(|c| usize::from(*c) + crate::display::BITMAP_COLUMNS <= 16)
                .ok_or(ConfigError::InvalidValue {
                    key: "bitmap_column",
                })?;
        } else if name.eq_ignore_ascii_case("bitmap_row") {
            self.bitmap_row = value
                .parse::<u8>()
                .ok()
                .filter(|r| *r == 0)
                .ok_or(ConfigError::InvalidValue { key: "bitmap_row" })?;
        } else {
            let mut unknown = heapless::String::new();
            for c in name.chars().take(32) {
                if unknown.push(c).is_err() {
                    break;
                }
            }
            return Err(ConfigError::UnknownKey { key: unknown });
        }

        Ok(())
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> &'a str {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &s[prefix.len()..],
        _ => s,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        v if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("on") => Some(true),
        v if v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_constants() {
        let config = Config::default();
        assert!(!config.enable_filter);
        assert_eq!(config.chart_mode, ChartMode::Average);
        assert_eq!(config.sensor_period_ms, 10_000);
        assert_eq!(config.history_interval_secs, 60);
        assert_eq!(config.bitmap_column, 12);
    }

    #[test]
    fn overrides_accept_environment_style_keys() {
        let mut config = Config::default();
        config.apply_override("THERMOGRAPH_ENABLE_FILTER", "true").unwrap();
        config.apply_override("chart_mode", "min_max").unwrap();
        config.apply_override("Log_Level", "DEBUG").unwrap();
        config.apply_override("sensor_period_ms", " 2500 ").unwrap();

        assert!(config.enable_filter);
        assert_eq!(config.chart_mode, ChartMode::MinMax);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.sensor_period_ms, 2500);
    }

    #[test]
    fn bad_values_leave_config_untouched() {
        let mut config = Config::default();
        assert_eq!(
            config.apply_override("filter_delta", "-1"),
            Err(ConfigError::InvalidValue {
                key: "filter_delta"
            })
        );
        assert_eq!(
            config.apply_override("bitmap_column", "13"),
            Err(ConfigError::InvalidValue {
                key: "bitmap_column"
            })
        );
        assert!(matches!(
            config.apply_override("THERMOGRAPH_WIFI", "x"),
            Err(ConfigError::UnknownKey { .. })
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    }
}

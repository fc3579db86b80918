//! Hardware-independent core library for thermograph
//!
//! This crate contains all platform-agnostic logic for the thermograph
//! indoor/outdoor thermometer: sensor conversion and filtering, the rolling
//! measurement history, the 16x2 character LCD adapter with its custom
//! character bitmap, and the display mode state machine.
//!
//! It is `#![no_std]` and allocation free so it compiles on both embedded
//! targets and desktop hosts (for the simulator and tests). Hardware is
//! reached through a handful of small traits ([`sensors::AnalogInput`],
//! [`sensors::HygroThermometer`], [`display::CharacterLcd`],
//! [`button::Keypad`], [`time::Clock`]) that the firmware and the simulator
//! implement.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod button;
pub mod config;
pub mod display;
pub mod history;
pub mod logging;
pub mod modes;
pub mod sensors;
pub mod time;

pub use app::{App, AppError};
pub use config::{ChartMode, Config, LogLevel};

//! Diagnostic log line format shared by the firmware and the simulator.
//!
//! Every record is prefixed with the precise uptime, the wall clock and a
//! three letter level tag, tab separated:
//!
//! ```text
//! 0:01:05.007	0:01:05	INF	sensor_service: polled
//! ```

use core::fmt;

use crate::time::{SysTime, WallTime};

pub const fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug | log::Level::Trace => "DBG",
    }
}

/// Write the record header (no message, no newline).
pub fn write_header<W: fmt::Write>(w: &mut W, uptime_ms: u64, level: log::Level) -> fmt::Result {
    write!(
        w,
        "{}\t{}\t{}\t",
        SysTime::from_millis(uptime_ms),
        WallTime::from_millis(uptime_ms),
        level_tag(level)
    )
}

/// Write one full log line, terminated by `\n`.
pub fn write_record<W: fmt::Write>(
    w: &mut W,
    uptime_ms: u64,
    level: log::Level,
    args: fmt::Arguments<'_>,
) -> fmt::Result {
    write_header(w, uptime_ms, level)?;
    w.write_fmt(args)?;
    w.write_char('\n')
}

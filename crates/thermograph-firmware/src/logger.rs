//! `log` backend printing over RTT with the shared line header.

use log::{LevelFilter, Log, Metadata, Record};
use rtt_target::rprint;

use thermograph_core::logging;
use thermograph_core::time::Clock;

use crate::clock::UptimeClock;

/// Longest line kept; the tail of longer messages is dropped.
const LINE_CAPACITY: usize = 192;

struct RttLogger;

static LOGGER: RttLogger = RttLogger;

impl Log for RttLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = heapless::String::<LINE_CAPACITY>::new();
        let uptime_ms = UptimeClock.millis();
        if logging::write_record(&mut line, uptime_ms, record.level(), *record.args()).is_err() {
            // Truncated; still terminate the line.
            rprint!("{}\n", line);
            return;
        }
        rprint!("{}", line);
    }

    fn flush(&self) {}
}

/// Install the RTT logger. `rtt_init_print!` must have run first.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

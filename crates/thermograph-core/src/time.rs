//! Uptime-derived wall clock.
//!
//! The device has no RTC; "time" is the monotonic millisecond counter split
//! into hours, minutes and seconds.

use core::cell::Cell;
use core::fmt;

const MS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Monotonic millisecond counter since boot.
pub trait Clock {
    fn millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn millis(&self) -> u64 {
        (**self).millis()
    }
}

/// Whole-second time of day since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct WallTime {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
}

impl WallTime {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn from_millis(ms: u64) -> Self {
        Self::from_seconds(ms / MS_PER_SECOND)
    }

    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: (total / SECONDS_PER_HOUR).min(u64::from(u32::MAX)) as u32,
            minutes: ((total / SECONDS_PER_MINUTE) % 60) as u8,
            seconds: (total % SECONDS_PER_MINUTE) as u8,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * SECONDS_PER_HOUR
            + u64::from(self.minutes) * SECONDS_PER_MINUTE
            + u64::from(self.seconds)
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn seconds_since(&self, earlier: WallTime) -> u64 {
        self.total_seconds().saturating_sub(earlier.total_seconds())
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Millisecond-resolution time since boot, used for scheduling and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SysTime {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl SysTime {
    pub fn from_millis(ms: u64) -> Self {
        let wall = WallTime::from_millis(ms);
        Self {
            hours: wall.hours,
            minutes: wall.minutes,
            seconds: wall.seconds,
            millis: (ms % MS_PER_SECOND) as u16,
        }
    }

    pub fn total_millis(&self) -> u64 {
        self.wall().total_seconds() * MS_PER_SECOND + u64::from(self.millis)
    }

    pub fn wall(&self) -> WallTime {
        WallTime {
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }
}

impl fmt::Display for SysTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

/// Converts the raw counter of a [`Clock`] into wall and system time.
pub struct TimeService<C> {
    clock: C,
}

impl<C: Clock> TimeService<C> {
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.millis()
    }

    pub fn now(&self) -> WallTime {
        WallTime::from_millis(self.elapsed_ms())
    }

    pub fn now_precise(&self) -> SysTime {
        SysTime::from_millis(self.elapsed_ms())
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Clock driven by hand. Used by tests and the simulator's fast-forward mode.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        // Never step backwards.
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn millis(&self) -> u64 {
        self.now.get()
    }
}

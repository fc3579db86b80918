use esp_hal::time::Instant;
use thermograph_core::time::Clock;

/// Milliseconds since boot from the system timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn millis(&self) -> u64 {
        Instant::now().duration_since_epoch().as_millis()
    }
}

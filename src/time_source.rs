//! Time source abstraction for supporting both real-time and simulated time.
//!
//! The picker never reads the system clock directly. It asks a `TimeSource` for the
//! current moment, which lets tests and scripted runs drive debounce, throttle and
//! minute-boundary timers deterministically by advancing a simulated clock.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Manually driven clock.
///
/// Time only moves through `advance`, `set` or `sleep`, and `sleep` returns
/// immediately after advancing the clock by the requested duration.
pub struct SimulatedTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(start_time),
        }
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: StdDuration) {
        let delta = ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::zero());
        let mut current = self.lock();
        if let Some(next) = current.checked_add_signed(delta) {
            *current = next;
        }
    }

    /// Jump to an arbitrary moment.
    pub fn set(&self, time: DateTime<Local>) {
        *self.lock() = time;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Local>> {
        // A poisoned clock still holds a valid timestamp
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.lock()
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(duration);
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Shared handle to the global time source
pub fn global() -> Arc<dyn TimeSource> {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid datetime '{s}'. Use YYYY-MM-DD HH:MM:SS"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("'{s}' does not exist in the local timezone"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_clock_only_moves_when_told() {
        let start = parse_datetime("2024-01-10 12:00:00").unwrap();
        let clock = SimulatedTimeSource::new(start);
        assert_eq!(clock.now(), start);
        assert!(clock.is_simulated());

        clock.advance(StdDuration::from_millis(250));
        assert_eq!(clock.now(), start + ChronoDuration::milliseconds(250));

        clock.sleep(StdDuration::from_secs(60));
        assert_eq!(clock.now(), start + ChronoDuration::milliseconds(60_250));

        let later = parse_datetime("2024-02-01 08:30:00").unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("2024-01-10").is_err());
        assert!(parse_datetime("yesterday").is_err());
        assert!(parse_datetime(" 2024-01-10 00:00:00 ").is_ok());
    }
}

//! Owned, cancelable timers for cooperative event loops.
//!
//! None of these timers runs on its own. Each one records a deadline and is driven by
//! `poll(now)` calls from its owner, which makes them deterministic under a simulated
//! clock and guarantees nothing fires after the owner cancels them or is dropped.

use chrono::{DateTime, Duration as ChronoDuration, Local, Timelike};
use std::time::Duration as StdDuration;

/// `now + interval`, falling back to `now` if the sum is not representable.
fn deadline_after(now: DateTime<Local>, interval: StdDuration) -> DateTime<Local> {
    ChronoDuration::from_std(interval)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(now)
}

/// Trailing-edge debounce: only the last scheduled value survives a quiet period.
///
/// Each `schedule` replaces the pending value and restarts the deadline.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: StdDuration,
    pending: Option<(T, DateTime<Local>)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: StdDuration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Schedule `value`, returning the value it superseded (if any).
    pub fn schedule(&mut self, value: T, now: DateTime<Local>) -> Option<T> {
        let deadline = deadline_after(now, self.interval);
        self.pending
            .replace((value, deadline))
            .map(|(superseded, _)| superseded)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: DateTime<Local>) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

/// Leading- and trailing-edge throttle.
///
/// A value submitted after a quiet interval is emitted immediately. Values arriving
/// within the interval overwrite each other and the latest one is emitted once the
/// interval since the last emission elapsed.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: StdDuration,
    last_emit: Option<DateTime<Local>>,
    trailing: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: StdDuration) -> Self {
        Self {
            interval,
            last_emit: None,
            trailing: None,
        }
    }

    fn window_open(&self, now: DateTime<Local>) -> bool {
        self.last_emit
            .is_none_or(|last| deadline_after(last, self.interval) <= now)
    }

    /// Submit a value; returns it right away when the throttle window is open.
    pub fn submit(&mut self, value: T, now: DateTime<Local>) -> Option<T> {
        if self.window_open(now) {
            self.last_emit = Some(now);
            self.trailing = None;
            Some(value)
        } else {
            self.trailing = Some(value);
            None
        }
    }

    /// Emit the trailing value once the window reopened.
    pub fn poll(&mut self, now: DateTime<Local>) -> Option<T> {
        if self.trailing.is_some() && self.window_open(now) {
            self.last_emit = Some(now);
            return self.trailing.take();
        }
        None
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        match (&self.trailing, self.last_emit) {
            (Some(_), Some(last)) => Some(deadline_after(last, self.interval)),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.trailing = None;
        self.last_emit = None;
    }
}

/// Start of the minute following `now`.
pub fn next_minute_boundary(now: DateTime<Local>) -> DateTime<Local> {
    let truncated = now
        .with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(now);
    truncated
        .checked_add_signed(ChronoDuration::minutes(1))
        .unwrap_or(now)
}

/// Fires once per wall-clock minute boundary.
///
/// The next deadline is computed from the time the tick was observed rather than
/// by adding a fixed period, so a late poll does not cause drift or a burst of
/// catch-up ticks.
#[derive(Debug, Clone)]
pub struct MinuteTicker {
    next: Option<DateTime<Local>>,
}

impl MinuteTicker {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            next: Some(next_minute_boundary(now)),
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.next
    }

    /// Returns true when a minute boundary was crossed since the last tick.
    pub fn poll(&mut self, now: DateTime<Local>) -> bool {
        match self.next {
            Some(deadline) if deadline <= now => {
                self.next = Some(next_minute_boundary(now));
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 10, h, m, s).single().unwrap()
            + ChronoDuration::milliseconds(ms)
    }

    #[test]
    fn test_debounce_last_value_wins() {
        let mut debouncer = Debouncer::new(StdDuration::from_millis(250));
        assert_eq!(debouncer.schedule("next", at(12, 0, 0, 0)), None);
        assert_eq!(debouncer.schedule("next", at(12, 0, 0, 100)), Some("next"));
        assert_eq!(debouncer.schedule("prev", at(12, 0, 0, 200)), Some("next"));

        // Deadline restarted by the last schedule
        assert_eq!(debouncer.poll(at(12, 0, 0, 350)), None);
        assert_eq!(debouncer.poll(at(12, 0, 0, 450)), Some("prev"));
        assert_eq!(debouncer.poll(at(12, 0, 1, 0)), None);
    }

    #[test]
    fn test_debounce_cancel() {
        let mut debouncer = Debouncer::new(StdDuration::from_millis(250));
        debouncer.schedule(1, at(12, 0, 0, 0));
        assert_eq!(debouncer.cancel(), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(at(12, 0, 5, 0)), None);
    }

    #[test]
    fn test_throttle_leading_and_trailing() {
        let mut throttle = Throttle::new(StdDuration::from_millis(16));
        assert_eq!(throttle.submit(1, at(12, 0, 0, 0)), Some(1));
        assert_eq!(throttle.submit(2, at(12, 0, 0, 5)), None);
        assert_eq!(throttle.submit(3, at(12, 0, 0, 10)), None);
        assert_eq!(throttle.deadline(), Some(at(12, 0, 0, 16)));

        assert_eq!(throttle.poll(at(12, 0, 0, 12)), None);
        assert_eq!(throttle.poll(at(12, 0, 0, 16)), Some(3));
        assert_eq!(throttle.poll(at(12, 0, 0, 40)), None);

        // Quiet long enough: leading edge again
        assert_eq!(throttle.submit(4, at(12, 0, 0, 40)), Some(4));
    }

    #[test]
    fn test_throttle_cancel_drops_trailing() {
        let mut throttle = Throttle::new(StdDuration::from_millis(16));
        throttle.submit(1, at(12, 0, 0, 0));
        throttle.submit(2, at(12, 0, 0, 1));
        throttle.cancel();
        assert_eq!(throttle.poll(at(12, 0, 1, 0)), None);
        assert_eq!(throttle.deadline(), None);
    }

    #[test]
    fn test_next_minute_boundary() {
        assert_eq!(next_minute_boundary(at(12, 0, 42, 500)), at(12, 1, 0, 0));
        assert_eq!(next_minute_boundary(at(12, 5, 0, 0)), at(12, 6, 0, 0));
        assert_eq!(next_minute_boundary(at(23, 59, 59, 999)), at(23, 59, 59, 999) + ChronoDuration::milliseconds(1));
    }

    #[test]
    fn test_minute_ticker_fires_once_per_boundary() {
        let mut ticker = MinuteTicker::new(at(12, 0, 30, 0));
        assert!(!ticker.poll(at(12, 0, 59, 999)));
        assert!(ticker.poll(at(12, 1, 0, 0)));
        assert!(!ticker.poll(at(12, 1, 30, 0)));
        assert_eq!(ticker.deadline(), Some(at(12, 2, 0, 0)));

        // A late poll fires once and reschedules from the observed time
        assert!(ticker.poll(at(12, 5, 10, 0)));
        assert!(!ticker.poll(at(12, 5, 20, 0)));
        assert_eq!(ticker.deadline(), Some(at(12, 6, 0, 0)));

        ticker.cancel();
        assert!(!ticker.poll(at(13, 0, 0, 0)));
    }
}

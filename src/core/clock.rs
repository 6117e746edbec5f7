// Injectable time source.
//
// Every window and cooldown in the engine is pruned lazily against a
// timestamp - there are no background timers anywhere. That only works if
// "now" is something we can control in tests, so the clock is a trait.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Supplies the current time to the engine.
///
/// Callers must hand the engine monotonic non-decreasing timestamps; the
/// engine never reaches for the wall clock on its own.
pub trait ClockSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by the scripted demo binary. Clones share the same
/// underlying instant, so one handle can be moved into the engine while
/// another stays behind to drive time forward.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.millis
            .fetch_add(step.as_millis() as i64, Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_shares_state() {
        let clock = ManualClock::new(DateTime::from_timestamp_millis(1_000).unwrap());
        let handle = clock.clone();

        handle.advance(Duration::from_millis(500));

        assert_eq!(clock.now().timestamp_millis(), 1_500);
        assert_eq!(handle.now(), clock.now());
    }

    #[test]
    fn system_clock_is_non_decreasing() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}

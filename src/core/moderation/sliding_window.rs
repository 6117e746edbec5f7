// Generic sliding-window event tracker.
//
// Records timestamped events per key and counts the ones inside a trailing
// window. Pruning happens on read, never via background timers, so behavior
// is deterministic under an injected clock.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::hash::Hash;

/// One recorded event. Immutable once recorded.
#[derive(Debug, Clone)]
pub struct WindowEvent {
    /// Message content, when the event has any (joins don't).
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Per-key event histories pruned against a trailing time window.
///
/// Pruning is idempotent and monotonic: an entry with `now - ts >= window`
/// is dropped and never reappears. A key whose history empties out stays in
/// the map as an empty vec, which is indistinguishable from a dropped key
/// as far as counts are concerned.
pub struct SlidingWindowTracker<K> {
    histories: DashMap<K, Vec<WindowEvent>>,
}

impl<K: Eq + Hash> SlidingWindowTracker<K> {
    pub fn new() -> Self {
        Self {
            histories: DashMap::new(),
        }
    }

    /// Append an event to the history for `key` without pruning.
    pub fn record(&self, key: K, event: WindowEvent) {
        self.histories.entry(key).or_default().push(event);
    }

    /// Prune entries older than `window_ms`, then count the survivors that
    /// satisfy `predicate`.
    pub fn count_matching<P>(
        &self,
        key: &K,
        now: DateTime<Utc>,
        window_ms: u64,
        predicate: P,
    ) -> usize
    where
        P: Fn(&WindowEvent) -> bool,
    {
        match self.histories.get_mut(key) {
            Some(mut history) => {
                prune(&mut history, now, window_ms);
                history.iter().filter(|e| predicate(e)).count()
            }
            None => 0,
        }
    }

    /// Prune, append `event`, then count matches - all under one entry guard,
    /// so concurrent evaluations for the same key cannot interleave between
    /// the record and the count.
    pub fn record_then_count<P>(
        &self,
        key: K,
        event: WindowEvent,
        now: DateTime<Utc>,
        window_ms: u64,
        predicate: P,
    ) -> usize
    where
        P: Fn(&WindowEvent) -> bool,
    {
        let mut history = self.histories.entry(key).or_default();
        prune(&mut history, now, window_ms);
        history.push(event);
        history.iter().filter(|e| predicate(e)).count()
    }
}

impl<K: Eq + Hash> Default for SlidingWindowTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only entries still inside the trailing window ending at `now`.
fn prune(history: &mut Vec<WindowEvent>, now: DateTime<Utc>, window_ms: u64) {
    history.retain(|e| {
        now.signed_duration_since(e.timestamp).num_milliseconds() < window_ms as i64
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn event_at(ms: i64) -> WindowEvent {
        WindowEvent {
            content: None,
            timestamp: ts(ms),
        }
    }

    #[test]
    fn counts_only_entries_inside_the_window() {
        let tracker: SlidingWindowTracker<u64> = SlidingWindowTracker::new();
        tracker.record(1, event_at(0));
        tracker.record(1, event_at(400));
        tracker.record(1, event_at(900));

        // Window of 1000ms ending at t=1000: the t=0 entry is exactly at the
        // boundary (now - ts >= window) and must not count.
        assert_eq!(tracker.count_matching(&1, ts(1_000), 1_000, |_| true), 2);
    }

    #[test]
    fn pruned_entries_never_reappear() {
        let tracker: SlidingWindowTracker<u64> = SlidingWindowTracker::new();
        tracker.record(1, event_at(0));

        assert_eq!(tracker.count_matching(&1, ts(5_000), 1_000, |_| true), 0);
        // Reading again with a window that would have covered t=0 still
        // counts nothing - the entry is gone, not hidden.
        assert_eq!(tracker.count_matching(&1, ts(5_000), 100_000, |_| true), 0);
    }

    #[test]
    fn unknown_key_counts_zero() {
        let tracker: SlidingWindowTracker<u64> = SlidingWindowTracker::new();
        assert_eq!(tracker.count_matching(&42, ts(0), 1_000, |_| true), 0);
    }

    #[test]
    fn predicate_filters_survivors() {
        let tracker: SlidingWindowTracker<&str> = SlidingWindowTracker::new();
        tracker.record(
            "k",
            WindowEvent {
                content: Some("a".into()),
                timestamp: ts(100),
            },
        );
        tracker.record(
            "k",
            WindowEvent {
                content: Some("b".into()),
                timestamp: ts(200),
            },
        );

        let matches = tracker.count_matching(&"k", ts(300), 1_000, |e| {
            e.content.as_deref() == Some("a")
        });
        assert_eq!(matches, 1);
    }

    #[test]
    fn record_then_count_includes_the_new_event() {
        let tracker: SlidingWindowTracker<u64> = SlidingWindowTracker::new();
        tracker.record(1, event_at(0));

        // The stale t=0 entry is pruned, the new one is appended and counted.
        let count = tracker.record_then_count(1, event_at(10_000), ts(10_000), 1_000, |_| true);
        assert_eq!(count, 1);
    }
}

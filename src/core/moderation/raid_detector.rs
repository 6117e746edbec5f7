// Raid detection - an anomalous burst of member joins.

use super::moderation_models::GuardConfig;
use super::sliding_window::{SlidingWindowTracker, WindowEvent};
use chrono::{DateTime, Utc};

/// Flags a coordinated-join burst. Joins are global to the community, so the
/// tracker runs on a single unit key.
///
/// Known limitation, kept on purpose: there is no debounce. While the join
/// count stays at or above the threshold the detector fires on every join,
/// and the caller's escalation (e.g. raising verification strictness) should
/// be idempotent.
pub struct RaidDetector {
    joins: SlidingWindowTracker<()>,
}

impl RaidDetector {
    pub fn new() -> Self {
        Self {
            joins: SlidingWindowTracker::new(),
        }
    }

    /// Record a join at `now` and report whether the window holds at least
    /// `raid_threshold` joins.
    pub fn evaluate(&self, now: DateTime<Utc>, config: &GuardConfig) -> bool {
        let joins = self.joins.record_then_count(
            (),
            WindowEvent {
                content: None,
                timestamp: now,
            },
            now,
            config.raid_time_frame_ms,
            |_| true,
        );

        joins as u32 >= config.raid_threshold
    }
}

impl Default for RaidDetector {
    fn default() -> Self {
        Self::new()
    }
}

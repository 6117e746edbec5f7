// Spam detection - repeated identical content from one user.

use super::moderation_models::GuardConfig;
use super::sliding_window::{SlidingWindowTracker, WindowEvent};
use chrono::{DateTime, Utc};

/// Flags a user who repeats the exact same message too often inside the
/// configured time frame.
///
/// Matching is exact string equality on the raw content - case-sensitive and
/// untrimmed. "hello" and "Hello " are different messages here.
pub struct SpamDetector {
    messages: SlidingWindowTracker<u64>,
}

impl SpamDetector {
    pub fn new() -> Self {
        Self {
            messages: SlidingWindowTracker::new(),
        }
    }

    /// Record the message and report whether it crossed the spam threshold.
    ///
    /// The message is always recorded, including when the threshold is
    /// already exceeded, so repeated evaluations keep an accurate rolling
    /// count. Returns true once more than `spam_threshold` identical
    /// messages sit inside the window.
    pub fn evaluate(
        &self,
        user_id: u64,
        content: &str,
        now: DateTime<Utc>,
        config: &GuardConfig,
    ) -> bool {
        let identical = self.messages.record_then_count(
            user_id,
            WindowEvent {
                content: Some(content.to_string()),
                timestamp: now,
            },
            now,
            config.spam_time_frame_ms,
            |e| e.content.as_deref() == Some(content),
        );

        identical as u32 > config.spam_threshold
    }
}

impl Default for SpamDetector {
    fn default() -> Self {
        Self::new()
    }
}

// Moderation domain models - data structures for the decision engine.
//
// These are pure domain types with no platform dependencies.
// The platform-integration layer converts these to real actions
// (message deletes, timeouts, verification-level changes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the decision engine.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("invalid duration '{0}': expected digits followed by s, m or h")]
    InvalidDuration(String),

    #[error("user {0} has no warnings to remove")]
    NoWarningsToRemove(u64),

    #[error("caller is not authorized to perform this operation")]
    NotAuthorized,

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("executor error: {0}")]
    ExecutorError(String),
}

/// An inbound chat message, narrowed to the fields the engine consumes.
///
/// The platform layer maps its own message object into this - the engine
/// never sees platform types, and correctness only depends on the caller
/// supplying monotonic non-decreasing timestamps.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub user_id: u64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_privileged: bool,
}

impl MessageEvent {
    /// Reject malformed input up front; every detector downstream is total
    /// over events that pass here.
    pub fn validate(&self) -> Result<(), ModerationError> {
        if self.user_id == 0 {
            return Err(ModerationError::InvalidEvent("zero user id".into()));
        }
        if self.content.is_empty() {
            return Err(ModerationError::InvalidEvent("empty content".into()));
        }
        if self.timestamp.timestamp_millis() < 0 {
            return Err(ModerationError::InvalidEvent(
                "timestamp before epoch".into(),
            ));
        }
        Ok(())
    }
}

/// A member-join event. Joins are tracked globally, so no user id is needed.
#[derive(Debug, Clone, Copy)]
pub struct JoinEvent {
    pub timestamp: DateTime<Utc>,
}

impl JoinEvent {
    pub fn validate(&self) -> Result<(), ModerationError> {
        if self.timestamp.timestamp_millis() < 0 {
            return Err(ModerationError::InvalidEvent(
                "timestamp before epoch".into(),
            ));
        }
        Ok(())
    }
}

/// A command invocation as delivered by the command-dispatch layer.
///
/// Dispatch (including unknown-command handling) stays with that layer; the
/// engine only throttles it through the cooldown gate.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub name: String,
    pub args: Vec<String>,
    pub caller_id: u64,
    pub is_privileged: bool,
}

/// What the external executor should do about an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ModAction {
    /// Nothing to do - message is clean
    None,
    /// Delete the offending message
    Delete,
    /// Delete and warn the user
    Warn { warning_count: u32 },
    /// Apply a timeout
    Timeout { duration: Duration },
    /// Delete the message and time the user out (spam response)
    DeleteAndTimeout { duration: Duration },
    /// Refuse a command invocation (cooldown)
    Reject,
}

/// One decision per inbound event, consumed by the platform layer.
///
/// The engine returns this without waiting on the executor; the executor
/// reports its outcome back through
/// [`ModerationService::log_action_outcome`](super::ModerationService::log_action_outcome).
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationDecision {
    pub action: ModAction,
    pub target_user_id: u64,
    pub reason: String,
}

impl ModerationDecision {
    /// Create a "nothing to do" decision.
    pub fn none(target_user_id: u64) -> Self {
        Self {
            action: ModAction::None,
            target_user_id,
            reason: String::new(),
        }
    }

    pub fn new(action: ModAction, target_user_id: u64, reason: impl Into<String>) -> Self {
        Self {
            action,
            target_user_id,
            reason: reason.into(),
        }
    }
}

/// Engine configuration - an immutable snapshot per evaluation.
///
/// Owned by the orchestrator, replaced wholesale through `set_config`.
/// The blocklist seeded from `blocked_users` is mutated only via the explicit
/// blacklist operations, never as a side effect of evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Identical messages allowed inside the spam window before the next one trips
    pub spam_threshold: u32,
    /// Spam window in milliseconds
    pub spam_time_frame_ms: u64,
    /// Timeout applied on a spam detection
    pub spam_timeout_ms: u64,
    /// Joins inside the raid window that signal a raid
    pub raid_threshold: u32,
    /// Raid window in milliseconds
    pub raid_time_frame_ms: u64,
    /// Warnings before the manual `warn` command escalates to a timeout
    pub warning_limit: u32,
    /// Minimum interval between accepted commands per user
    pub command_cooldown_ms: u64,
    /// Timeout applied when content-policy escalation reaches the Timeout tier
    pub auto_timeout_ms: u64,
    /// Terms matched case-insensitively as substrings of message content
    pub blocked_terms: Vec<String>,
    /// Users whose every message violates policy
    pub blocked_users: Vec<u64>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            spam_threshold: 5,         // 5 identical messages...
            spam_time_frame_ms: 5_000, // ...in 5 seconds
            spam_timeout_ms: 60_000,   // 1 minute timeout for spammers
            raid_threshold: 10,        // 10 joins...
            raid_time_frame_ms: 60_000, // ...in 1 minute
            warning_limit: 3,          // 3 warnings before auto-timeout
            command_cooldown_ms: 5_000, // 5 seconds between commands
            auto_timeout_ms: 300_000,  // 5 minute timeout at the top tier
            blocked_terms: Vec::new(),
            blocked_users: Vec::new(),
        }
    }
}

impl GuardConfig {
    /// Check the ranges the engine relies on. A zero window or threshold
    /// would make every evaluation either a no-op or an instant trip.
    pub fn validate(&self) -> Result<(), ModerationError> {
        if self.spam_threshold == 0 {
            return Err(ModerationError::InvalidConfig(
                "spam_threshold must be greater than zero".into(),
            ));
        }
        if self.spam_time_frame_ms == 0 {
            return Err(ModerationError::InvalidConfig(
                "spam_time_frame_ms must be greater than zero".into(),
            ));
        }
        if self.raid_threshold == 0 {
            return Err(ModerationError::InvalidConfig(
                "raid_threshold must be greater than zero".into(),
            ));
        }
        if self.raid_time_frame_ms == 0 {
            return Err(ModerationError::InvalidConfig(
                "raid_time_frame_ms must be greater than zero".into(),
            ));
        }
        if self.warning_limit == 0 {
            return Err(ModerationError::InvalidConfig(
                "warning_limit must be at least one".into(),
            ));
        }
        Ok(())
    }
}

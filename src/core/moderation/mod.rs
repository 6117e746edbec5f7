// Core moderation module - the moderation decision engine.
//
// Sliding-window abuse detection (spam, raid), per-user warning escalation,
// command-rate throttling and content policy checks. The orchestrator in
// `moderation_service` composes the pieces into one decision per event.

pub mod content_policy;
pub mod cooldown;
pub mod duration;
pub mod moderation_models;
pub mod moderation_service;
pub mod raid_detector;
pub mod sliding_window;
pub mod spam_detector;
pub mod warnings;

pub use moderation_models::*;
pub use moderation_service::*;

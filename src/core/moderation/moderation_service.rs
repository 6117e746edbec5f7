// Moderation orchestrator - composes the detectors, policy, warnings and
// cooldowns into one decision per inbound event.
//
// NO platform dependencies here - just pure domain logic. The platform
// layer executes decisions through the ActionExecutor port and reports the
// outcome back, which the engine logs but never retries.

use super::content_policy::ContentPolicy;
use super::cooldown::CooldownGate;
use super::duration::parse_timeout;
use super::moderation_models::{
    CommandInvocation, GuardConfig, JoinEvent, MessageEvent, ModAction, ModerationDecision,
    ModerationError,
};
use super::raid_detector::RaidDetector;
use super::spam_detector::SpamDetector;
use super::warnings::{EscalationTier, WarningEscalationEngine};
use crate::core::clock::ClockSource;
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

// ============================================================================
// EXECUTOR TRAIT (PORT)
// ============================================================================

/// The platform side of a decision: delete the message, apply the timeout,
/// raise the verification level, send the DM.
///
/// The engine hands a decision over and moves on; it does not wait for the
/// executor before deciding the next event. Outcomes come back through
/// [`ModerationService::log_action_outcome`].
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, decision: &ModerationDecision) -> Result<(), ModerationError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Result of the manual `warn` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarnOutcome {
    pub warning_count: u32,
    /// The count reached `warning_limit`; the caller should follow up with
    /// an automatic timeout, distinct from tier escalation.
    pub limit_reached: bool,
}

/// The moderation decision engine for one community.
///
/// Owns every per-user map (message history, warnings, cooldowns, blocklist),
/// so independent communities get independent instances and teardown is just
/// dropping the value. The clock is injected; message and join evaluations
/// use the timestamps carried by the events themselves, command gating uses
/// the clock.
pub struct ModerationService<C: ClockSource> {
    clock: C,
    config: RwLock<GuardConfig>,
    spam: SpamDetector,
    raids: RaidDetector,
    warnings: WarningEscalationEngine,
    cooldowns: CooldownGate,
    policy: ContentPolicy,
}

impl<C: ClockSource> ModerationService<C> {
    /// Create an engine from a validated config. The config's `blocked_users`
    /// seed the live blocklist.
    pub fn new(config: GuardConfig, clock: C) -> Result<Self, ModerationError> {
        config.validate()?;
        let policy = ContentPolicy::new(config.blocked_users.iter().copied());
        Ok(Self {
            clock,
            config: RwLock::new(config),
            spam: SpamDetector::new(),
            raids: RaidDetector::new(),
            warnings: WarningEscalationEngine::new(),
            cooldowns: CooldownGate::new(),
            policy,
        })
    }

    fn config_snapshot(&self) -> GuardConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Decide what to do about an inbound message.
    ///
    /// Check order: spam short-circuits everything, then content policy
    /// (blocked terms, blocked author). A clean message decides `None`.
    pub fn on_message(&self, event: &MessageEvent) -> Result<ModerationDecision, ModerationError> {
        event.validate()?;
        let config = self.config_snapshot();
        let now = event.timestamp;

        if self.spam.evaluate(event.user_id, &event.content, now, &config) {
            let decision = ModerationDecision::new(
                ModAction::DeleteAndTimeout {
                    duration: Duration::from_millis(config.spam_timeout_ms),
                },
                event.user_id,
                "spam",
            );
            tracing::info!(user_id = event.user_id, "spam detected");
            return Ok(decision);
        }

        let violation = self
            .policy
            .violating_term(&event.content, &config.blocked_terms)
            .map(|term| format!("blocked term: {term}"))
            .or_else(|| {
                self.policy
                    .is_blocked_user(event.user_id)
                    .then(|| "blocked user".to_string())
            });

        if let Some(reason) = violation {
            // Decide-then-increment: the tier is read from the count as it
            // stood *before* this violation, then Warn/Timeout advance the
            // count so the next violation escalates further.
            let action = match self.warnings.tier_for(event.user_id) {
                EscalationTier::Delete => ModAction::Delete,
                EscalationTier::Warn => ModAction::Warn {
                    warning_count: self.warnings.warn(event.user_id),
                },
                EscalationTier::Timeout => {
                    self.warnings.warn(event.user_id);
                    ModAction::Timeout {
                        duration: Duration::from_millis(config.auto_timeout_ms),
                    }
                }
            };
            tracing::info!(user_id = event.user_id, %reason, ?action, "content violation");
            return Ok(ModerationDecision::new(action, event.user_id, reason));
        }

        Ok(ModerationDecision::none(event.user_id))
    }

    /// Gate a command invocation through the per-user cooldown.
    ///
    /// Returns `Reject` while the caller's cooldown is live, `None` when the
    /// command may proceed. Dispatch itself (including unknown commands)
    /// belongs to the command layer.
    pub fn on_command(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<ModerationDecision, ModerationError> {
        if invocation.caller_id == 0 {
            return Err(ModerationError::InvalidEvent("zero caller id".into()));
        }
        let config = self.config_snapshot();

        let acquired = self.cooldowns.try_acquire(
            invocation.caller_id,
            self.clock.now(),
            config.command_cooldown_ms,
            invocation.is_privileged,
        );
        if !acquired {
            tracing::debug!(
                caller_id = invocation.caller_id,
                command = %invocation.name,
                "command rejected by cooldown"
            );
            return Ok(ModerationDecision::new(
                ModAction::Reject,
                invocation.caller_id,
                "cooldown",
            ));
        }

        Ok(ModerationDecision::none(invocation.caller_id))
    }

    /// Record a member join and report whether it looks like a raid. On
    /// `true` the caller is expected to escalate guild-wide; the signal
    /// re-fires on every join while the window stays above threshold.
    pub fn on_join(&self, event: &JoinEvent) -> Result<bool, ModerationError> {
        event.validate()?;
        let config = self.config_snapshot();
        let raid = self.raids.evaluate(event.timestamp, &config);
        if raid {
            tracing::warn!("raid detected");
        }
        Ok(raid)
    }

    // ------------------------------------------------------------------
    // Manual commands - privileged operations invoked by the command layer
    // ------------------------------------------------------------------

    /// Manually warn a user. `limit_reached` tells the caller to follow up
    /// with an automatic timeout.
    pub fn warn_user(
        &self,
        caller_is_privileged: bool,
        target_user_id: u64,
    ) -> Result<WarnOutcome, ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        let warning_count = self.warnings.warn(target_user_id);
        let limit = self.config_snapshot().warning_limit;
        let limit_reached = self.warnings.reached_limit(target_user_id, limit);
        tracing::info!(target_user_id, warning_count, limit_reached, "user warned");
        Ok(WarnOutcome {
            warning_count,
            limit_reached,
        })
    }

    /// Remove one warning. Errors with `NoWarningsToRemove` at zero.
    pub fn unwarn_user(
        &self,
        caller_is_privileged: bool,
        target_user_id: u64,
    ) -> Result<u32, ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        let remaining = self.warnings.unwarn(target_user_id)?;
        tracing::info!(target_user_id, remaining, "warning removed");
        Ok(remaining)
    }

    pub fn warnings_of(&self, target_user_id: u64) -> u32 {
        self.warnings.count(target_user_id)
    }

    pub fn blacklist_user(
        &self,
        caller_is_privileged: bool,
        target_user_id: u64,
    ) -> Result<(), ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        self.policy.add_blocked_user(target_user_id);
        tracing::info!(target_user_id, "user blacklisted");
        Ok(())
    }

    pub fn unblacklist_user(
        &self,
        caller_is_privileged: bool,
        target_user_id: u64,
    ) -> Result<(), ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        self.policy.remove_blocked_user(target_user_id);
        tracing::info!(target_user_id, "user removed from blacklist");
        Ok(())
    }

    pub fn blacklisted_users(&self) -> Vec<u64> {
        self.policy.blocked_users()
    }

    /// Build a manual timeout decision from a duration string like "60s".
    pub fn timeout_user(
        &self,
        caller_is_privileged: bool,
        target_user_id: u64,
        duration: &str,
    ) -> Result<ModerationDecision, ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        let duration_parsed = parse_timeout(duration)?;
        Ok(ModerationDecision::new(
            ModAction::Timeout {
                duration: duration_parsed,
            },
            target_user_id,
            format!("manual timeout ({duration})"),
        ))
    }

    pub fn get_config(&self) -> GuardConfig {
        self.config_snapshot()
    }

    /// Replace the config. The live blocklist is not reseeded - blocklist
    /// changes go through the blacklist operations.
    pub fn set_config(
        &self,
        caller_is_privileged: bool,
        config: GuardConfig,
    ) -> Result<(), ModerationError> {
        if !caller_is_privileged {
            return Err(ModerationError::NotAuthorized);
        }
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        tracing::info!("configuration updated");
        Ok(())
    }

    /// Log the outcome the executor reported for a decision. No retries.
    pub fn log_action_outcome(
        &self,
        decision: &ModerationDecision,
        outcome: Result<(), ModerationError>,
    ) {
        match outcome {
            Ok(()) => tracing::info!(
                target_user_id = decision.target_user_id,
                action = ?decision.action,
                reason = %decision.reason,
                "moderation action executed"
            ),
            Err(err) => tracing::warn!(
                target_user_id = decision.target_user_id,
                action = ?decision.action,
                error = %err,
                "moderation action failed"
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

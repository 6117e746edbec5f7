// This is the entry point of the chat_guardian demo binary.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - this binary = the composition root standing in for a platform layer
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize the moderation engine (dependency injection)
// 3. Replay a scripted stream of chat events through it
// 4. Execute decisions through a console-backed ActionExecutor
//
// A real deployment replaces steps 3-4 with a platform gateway (Discord,
// Matrix, IRC, ...) feeding live events and executing real actions.

use anyhow::Context as _;
use async_trait::async_trait;
use chat_guardian::core::clock::{ClockSource, ManualClock};
use chat_guardian::core::moderation::{
    ActionExecutor, CommandInvocation, GuardConfig, JoinEvent, MessageEvent, ModAction,
    ModerationDecision, ModerationError, ModerationService,
};
use chrono::Utc;
use std::time::Duration;

const CONFIG_PATH: &str = "guardian.json";

/// Executor that "performs" actions by logging them. A platform layer would
/// call into its chat API here instead.
struct ConsoleExecutor;

#[async_trait]
impl ActionExecutor for ConsoleExecutor {
    async fn execute(&self, decision: &ModerationDecision) -> Result<(), ModerationError> {
        match &decision.action {
            ModAction::None => {}
            ModAction::Delete => {
                tracing::info!(user = decision.target_user_id, "delete message");
            }
            ModAction::Warn { warning_count } => {
                tracing::info!(
                    user = decision.target_user_id,
                    warning_count,
                    "delete message and DM warning"
                );
            }
            ModAction::Timeout { duration } => {
                tracing::info!(
                    user = decision.target_user_id,
                    secs = duration.as_secs(),
                    "apply timeout"
                );
            }
            ModAction::DeleteAndTimeout { duration } => {
                tracing::info!(
                    user = decision.target_user_id,
                    secs = duration.as_secs(),
                    "delete message and apply timeout"
                );
            }
            ModAction::Reject => {
                tracing::info!(user = decision.target_user_id, "reply: please slow down");
            }
        }
        Ok(())
    }
}

/// Read the optional config file; fall back to defaults with a couple of
/// blocked terms so the scripted run has something to trip on.
fn load_config() -> anyhow::Result<GuardConfig> {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(raw) => {
            let config: GuardConfig = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {CONFIG_PATH}"))?;
            config.validate()?;
            Ok(config)
        }
        Err(_) => Ok(GuardConfig {
            blocked_terms: vec!["badword1".into(), "badword2".into()],
            ..Default::default()
        }),
    }
}

async fn run_scenario(
    service: &ModerationService<ManualClock>,
    clock: &ManualClock,
    executor: &ConsoleExecutor,
) -> anyhow::Result<()> {
    let spammer = 101;
    let offender = 102;
    let moderator = 103;

    let send = |user_id: u64, content: &str| MessageEvent {
        user_id,
        content: content.to_string(),
        timestamp: clock.now(),
        is_privileged: false,
    };

    // A burst of identical messages; the engine starts deleting and timing
    // out once the spam threshold is crossed.
    tracing::info!("--- spam burst ---");
    for _ in 0..7 {
        let decision = service.on_message(&send(spammer, "buy cheap coins now"))?;
        let outcome = executor.execute(&decision).await;
        service.log_action_outcome(&decision, outcome);
        clock.advance(Duration::from_millis(120));
    }

    // Content violations escalate through the warning tiers.
    tracing::info!("--- content policy ---");
    service.warn_user(true, offender)?;
    for _ in 0..3 {
        let decision = service.on_message(&send(offender, "this contains badword1"))?;
        let outcome = executor.execute(&decision).await;
        service.log_action_outcome(&decision, outcome);
        clock.advance(Duration::from_secs(1));
    }

    // A join flood flips the raid signal.
    tracing::info!("--- join flood ---");
    for i in 0..10 {
        let raid = service.on_join(&JoinEvent {
            timestamp: clock.now(),
        })?;
        if raid {
            tracing::warn!(join = i + 1, "raise verification level");
        }
        clock.advance(Duration::from_secs(2));
    }

    // Commands are throttled per user; moderators bypass the gate.
    tracing::info!("--- command cooldowns ---");
    let member_cmd = CommandInvocation {
        name: "userinfo".into(),
        args: vec![],
        caller_id: spammer,
        is_privileged: false,
    };
    let mod_cmd = CommandInvocation {
        name: "timeout".into(),
        args: vec![offender.to_string(), "5m".into()],
        caller_id: moderator,
        is_privileged: true,
    };
    for invocation in [&member_cmd, &member_cmd, &mod_cmd, &mod_cmd] {
        let decision = service.on_command(invocation)?;
        let outcome = executor.execute(&decision).await;
        service.log_action_outcome(&decision, outcome);
    }

    // The moderator's timeout command, parsed and executed.
    let decision = service.timeout_user(true, offender, "5m")?;
    let outcome = executor.execute(&decision).await;
    service.log_action_outcome(&decision, outcome);

    tracing::info!(
        warnings = service.warnings_of(offender),
        blacklist = ?service.blacklisted_users(),
        "final state"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    tracing::info!(?config, "engine configuration");

    // The manual clock drives the script deterministically; a live gateway
    // would inject SystemClock and stamp events as they arrive.
    let clock = ManualClock::new(Utc::now());
    let service = ModerationService::new(config, clock.clone())?;
    let executor = ConsoleExecutor;

    run_scenario(&service, &clock, &executor).await
}

// Command-rate throttling - one accepted command per user per cooldown.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Per-user expiry timestamps gating command execution frequency.
///
/// Expiry is checked lazily on the next acquisition attempt - there is no
/// background sweep. An expired entry is simply overwritten.
pub struct CooldownGate {
    expiries: DashMap<u64, DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self {
            expiries: DashMap::new(),
        }
    }

    /// Try to take the cooldown slot for `user_id`.
    ///
    /// Privileged callers always succeed and leave no state behind. For
    /// everyone else: fails while an unexpired entry exists; on success the
    /// expiry is set to `now + cooldown_ms`.
    pub fn try_acquire(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
        cooldown_ms: u64,
        is_privileged: bool,
    ) -> bool {
        if is_privileged {
            return true;
        }

        if let Some(expiry) = self.expiries.get(&user_id) {
            if now < *expiry {
                return false;
            }
        }

        self.expiries
            .insert(user_id, now + Duration::milliseconds(cooldown_ms as i64));
        true
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn privileged_callers_always_pass_and_record_nothing() {
        let gate = CooldownGate::new();
        assert!(gate.try_acquire(1, ts(0), 5_000, true));
        assert!(gate.try_acquire(1, ts(1), 5_000, true));
        // No state was written, so an unprivileged attempt still succeeds.
        assert!(gate.try_acquire(1, ts(2), 5_000, false));
    }

    #[test]
    fn second_attempt_inside_the_cooldown_fails() {
        let gate = CooldownGate::new();
        assert!(gate.try_acquire(1, ts(0), 5_000, false));
        assert!(!gate.try_acquire(1, ts(4_999), 5_000, false));
        assert!(gate.try_acquire(1, ts(5_000), 5_000, false));
    }

    #[test]
    fn users_do_not_share_cooldowns() {
        let gate = CooldownGate::new();
        assert!(gate.try_acquire(1, ts(0), 5_000, false));
        assert!(gate.try_acquire(2, ts(0), 5_000, false));
        assert!(!gate.try_acquire(1, ts(100), 5_000, false));
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let gate = CooldownGate::new();
        assert!(gate.try_acquire(1, ts(0), 0, false));
        assert!(gate.try_acquire(1, ts(0), 0, false));
    }
}

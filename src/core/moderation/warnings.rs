// Warning escalation - per-user counters and the tier they map to.

use super::moderation_models::ModerationError;
use dashmap::DashMap;

/// The automatic content-policy response for a given warning count.
///
/// This tiering decides what happens to a *violating message*; it is
/// distinct from the manual `warn` command and from the warning-limit
/// auto-timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationTier {
    /// No prior warnings - just remove the message
    Delete,
    /// 1-2 warnings - warn again
    Warn,
    /// 3 or more - time the user out
    Timeout,
}

/// Per-user warning counts. Created lazily on the first violation, never
/// below zero, kept for the process lifetime.
pub struct WarningEscalationEngine {
    counts: DashMap<u64, u32>,
}

impl WarningEscalationEngine {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Increment the user's count and return the new total.
    pub fn warn(&self, user_id: u64) -> u32 {
        let mut count = self.counts.entry(user_id).or_insert(0);
        *count += 1;
        *count
    }

    /// Decrement the user's count, floored at zero. A user already at zero
    /// has nothing to remove and that is an error, not a silent no-op.
    pub fn unwarn(&self, user_id: u64) -> Result<u32, ModerationError> {
        match self.counts.get_mut(&user_id) {
            Some(mut count) if *count > 0 => {
                *count -= 1;
                Ok(*count)
            }
            _ => Err(ModerationError::NoWarningsToRemove(user_id)),
        }
    }

    pub fn count(&self, user_id: u64) -> u32 {
        self.counts.get(&user_id).map(|c| *c).unwrap_or(0)
    }

    pub fn tier_for(&self, user_id: u64) -> EscalationTier {
        match self.count(user_id) {
            0 => EscalationTier::Delete,
            1..=2 => EscalationTier::Warn,
            _ => EscalationTier::Timeout,
        }
    }

    /// True once the user's count has reached `limit`. The orchestrator uses
    /// this to fire an automatic timeout from the manual warn path.
    pub fn reached_limit(&self, user_id: u64, limit: u32) -> bool {
        self.count(user_id) >= limit
    }
}

impl Default for WarningEscalationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_increments_and_returns_the_new_count() {
        let warnings = WarningEscalationEngine::new();
        assert_eq!(warnings.warn(1), 1);
        assert_eq!(warnings.warn(1), 2);
        assert_eq!(warnings.count(1), 2);
        assert_eq!(warnings.count(2), 0);
    }

    #[test]
    fn unwarn_floors_at_zero() {
        let warnings = WarningEscalationEngine::new();
        warnings.warn(1);
        assert_eq!(warnings.unwarn(1).unwrap(), 0);

        assert!(matches!(
            warnings.unwarn(1),
            Err(ModerationError::NoWarningsToRemove(1))
        ));
        // A user the engine has never seen also has nothing to remove.
        assert!(matches!(
            warnings.unwarn(99),
            Err(ModerationError::NoWarningsToRemove(99))
        ));
        assert_eq!(warnings.count(1), 0);
    }

    #[test]
    fn tiers_are_exact_at_the_boundaries() {
        let warnings = WarningEscalationEngine::new();
        assert_eq!(warnings.tier_for(1), EscalationTier::Delete);

        warnings.warn(1);
        assert_eq!(warnings.tier_for(1), EscalationTier::Warn);
        warnings.warn(1);
        assert_eq!(warnings.tier_for(1), EscalationTier::Warn);

        warnings.warn(1);
        assert_eq!(warnings.tier_for(1), EscalationTier::Timeout);
        warnings.warn(1);
        assert_eq!(warnings.tier_for(1), EscalationTier::Timeout);
    }

    #[test]
    fn reached_limit_is_inclusive() {
        let warnings = WarningEscalationEngine::new();
        warnings.warn(1);
        warnings.warn(1);
        assert!(!warnings.reached_limit(1, 3));
        warnings.warn(1);
        assert!(warnings.reached_limit(1, 3));
    }
}

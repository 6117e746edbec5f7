// Content policy - blocked terms and the user blocklist.

use dashmap::DashSet;

/// Matches message text against the configured blocked terms and tracks the
/// set of blocked users.
///
/// Blocked terms live in the config snapshot passed per evaluation; the user
/// blocklist is owned here and mutated only through the explicit
/// add/remove operations backing the blacklist commands.
pub struct ContentPolicy {
    blocked_users: DashSet<u64>,
}

impl ContentPolicy {
    pub fn new(blocked_users: impl IntoIterator<Item = u64>) -> Self {
        Self {
            blocked_users: blocked_users.into_iter().collect(),
        }
    }

    /// Case-insensitive substring search. Returns the first configured term
    /// found in `content`, in configuration order.
    pub fn violating_term<'a>(&self, content: &str, blocked_terms: &'a [String]) -> Option<&'a str> {
        let lowered = content.to_lowercase();
        blocked_terms
            .iter()
            .map(String::as_str)
            .find(|term| lowered.contains(term.to_lowercase().as_str()))
    }

    pub fn is_blocked_user(&self, user_id: u64) -> bool {
        self.blocked_users.contains(&user_id)
    }

    /// Idempotent - blocking a blocked user is a no-op.
    pub fn add_blocked_user(&self, user_id: u64) {
        self.blocked_users.insert(user_id);
    }

    /// Idempotent - unblocking an unknown user is a no-op.
    pub fn remove_blocked_user(&self, user_id: u64) {
        self.blocked_users.remove(&user_id);
    }

    /// Snapshot of the blocklist, sorted for stable output.
    pub fn blocked_users(&self) -> Vec<u64> {
        let mut users: Vec<u64> = self.blocked_users.iter().map(|u| *u).collect();
        users.sort_unstable();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_terms_case_insensitively_as_substrings() {
        let policy = ContentPolicy::new([]);
        let blocked = terms(&["badword", "scam"]);

        assert_eq!(
            policy.violating_term("this has a BadWord inside", &blocked),
            Some("badword")
        );
        assert_eq!(policy.violating_term("free SCAMS here", &blocked), Some("scam"));
        assert_eq!(policy.violating_term("perfectly fine", &blocked), None);
    }

    #[test]
    fn returns_the_first_configured_match() {
        let policy = ContentPolicy::new([]);
        let blocked = terms(&["alpha", "beta"]);

        assert_eq!(
            policy.violating_term("beta then alpha", &blocked),
            Some("alpha")
        );
    }

    #[test]
    fn blocklist_mutation_is_idempotent() {
        let policy = ContentPolicy::new([7]);
        assert!(policy.is_blocked_user(7));

        policy.add_blocked_user(7);
        policy.add_blocked_user(9);
        assert_eq!(policy.blocked_users(), vec![7, 9]);

        policy.remove_blocked_user(7);
        policy.remove_blocked_user(7);
        assert!(!policy.is_blocked_user(7));
        assert_eq!(policy.blocked_users(), vec![9]);
    }
}

use std::collections::HashMap;

use super::tokens::{ResetAttemptTracker, ResetToken};

/// In-memory tracking of outstanding reset tokens and per-address
/// attempt counters. One outstanding token per email: issuing a new one
/// replaces any previous token for that address.
#[derive(Default)]
pub struct ResetStore {
    tokens: HashMap<String, ResetToken>,
    attempts: HashMap<String, ResetAttemptTracker>,
}

impl ResetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding, still-valid token for an email, if any.
    /// Expired tokens are dropped on the way out.
    pub fn outstanding(&mut self, email: &str) -> Option<&ResetToken> {
        if self.tokens.get(email).is_some_and(|t| t.is_expired()) {
            self.tokens.remove(email);
        }
        self.tokens.get(email)
    }

    /// Store a newly issued token, replacing any outstanding one
    pub fn put(&mut self, token: ResetToken) {
        self.tokens.insert(token.user_email.clone(), token);
    }

    /// Record a reset request for rate limiting. Returns the seconds
    /// until retry is allowed when the address is over budget.
    pub fn record_attempt(&mut self, email: &str) -> Result<(), u64> {
        let tracker = self.attempts.entry(email.to_string()).or_default();
        if tracker.is_rate_limited() {
            return Err(tracker.retry_after());
        }
        tracker.record();
        Ok(())
    }

    /// Consume a token: a matching, unexpired token for the email is
    /// removed and `true` is returned. Anything else returns `false`
    /// and (apart from dropping an expired token) leaves state unchanged.
    pub fn consume(&mut self, email: &str, token: &str) -> bool {
        match self.outstanding(email) {
            Some(outstanding) if outstanding.token == token => {
                self.tokens.remove(email);
                true
            }
            _ => false,
        }
    }
}

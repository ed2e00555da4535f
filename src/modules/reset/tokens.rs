use base64::{engine::general_purpose::URL_SAFE_NO_PAD as base64_url, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::modules::utils::time::get_current_timestamp;
use crate::{MAX_RESET_ATTEMPTS, RESET_ATTEMPT_WINDOW, RESET_TOKEN_DURATION};

/// A single-use reset token bound to one user and one request
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: u64,
    pub user_id: u64,
    pub user_email: String,
}

impl ResetToken {
    /// Issue a fresh token for the given user, expiring after the
    /// configured duration
    pub fn issue(user_id: u64, user_email: &str) -> Self {
        Self {
            token: generate_reset_token(),
            expires_at: get_current_timestamp() + RESET_TOKEN_DURATION,
            user_id,
            user_email: user_email.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        get_current_timestamp() > self.expires_at
    }
}

/// Generate an unguessable reset token: 32 random bytes, URL-safe
/// base64 so it can be embedded in a link without escaping
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64_url.encode(bytes)
}

/// Structure to track password reset attempts to prevent abuse
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetAttemptTracker {
    pub attempts: u32,
    pub first_attempt: u64,
    pub last_attempt: u64,
}

impl ResetAttemptTracker {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            first_attempt: 0,
            last_attempt: 0,
        }
    }

    /// Record one attempt, restarting the window once the previous one
    /// has elapsed
    pub fn record(&mut self) {
        let now = get_current_timestamp();
        if self.attempts == 0 || now - self.first_attempt > RESET_ATTEMPT_WINDOW {
            self.attempts = 0;
            self.first_attempt = now;
        }
        self.attempts += 1;
        self.last_attempt = now;
    }

    /// Whether the current window has exhausted its attempt budget
    pub fn is_rate_limited(&self) -> bool {
        self.attempts >= MAX_RESET_ATTEMPTS
            && get_current_timestamp() - self.first_attempt <= RESET_ATTEMPT_WINDOW
    }

    /// Seconds until the current window expires and attempts are allowed again
    pub fn retry_after(&self) -> u64 {
        let elapsed = get_current_timestamp() - self.first_attempt;
        RESET_ATTEMPT_WINDOW.saturating_sub(elapsed)
    }
}

impl Default for ResetAttemptTracker {
    fn default() -> Self {
        Self::new()
    }
}

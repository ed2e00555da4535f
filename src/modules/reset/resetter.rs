use super::store::ResetStore;
use super::tokens::ResetToken;
use crate::modules::account::password::{validate_password, Password, PasswordError};
use crate::modules::account::user::User;
use crate::modules::notify::templates::reset_message;
use crate::modules::notify::NotificationSender;
use crate::modules::utils::logging::log_reset_event;

/// Policy for a reset request when an unexpired token is already
/// outstanding for the address: reissue a fresh token every time, or
/// re-send the outstanding one ("resend" semantics)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResendPolicy {
    ReissueAlways,
    ReuseOutstanding,
}

/// Errors surfaced by the reset flow
#[derive(Debug)]
pub enum ResetError {
    /// Too many requests for this address; retry after the given seconds
    RateLimited(u64),
    /// The notification capability reported a delivery failure
    Delivery(String),
    /// The presented token does not match an outstanding, unexpired one
    InvalidToken,
    /// The chosen replacement password fails the strength policy
    WeakPassword(PasswordError),
}

/// Orchestrates the reset flow: issues a token, composes the reset
/// link, and dispatches it through the injected notification capability.
/// Holds no state beyond the token bookkeeping; delivery outcome is
/// entirely the capability's concern.
pub struct PasswordResetter<'a> {
    sender: &'a dyn NotificationSender,
    store: ResetStore,
    policy: ResendPolicy,
}

impl<'a> PasswordResetter<'a> {
    pub fn new(sender: &'a dyn NotificationSender, policy: ResendPolicy) -> Self {
        Self {
            sender,
            store: ResetStore::new(),
            policy,
        }
    }

    /// Issue (or re-send) a reset token for the user and dispatch the
    /// reset link to their email. Exactly one send per successful call.
    pub fn reset(&mut self, user: &User) -> Result<ResetToken, ResetError> {
        if let Err(retry_after) = self.store.record_attempt(user.email()) {
            log_reset_event(
                "request",
                user.email(),
                false,
                Some(&format!("rate limited, retry in {}s", retry_after)),
            );
            return Err(ResetError::RateLimited(retry_after));
        }

        let token = match self.policy {
            ResendPolicy::ReuseOutstanding => match self.store.outstanding(user.email()) {
                Some(outstanding) => outstanding.clone(),
                None => ResetToken::issue(user.id(), user.email()),
            },
            ResendPolicy::ReissueAlways => ResetToken::issue(user.id(), user.email()),
        };

        let message = reset_message(&token.token);
        if let Err(e) = self.sender.send(user.email(), &message) {
            log_reset_event("request", user.email(), false, Some(&e));
            return Err(ResetError::Delivery(e));
        }

        self.store.put(token.clone());
        log_reset_event("request", user.email(), true, None);
        Ok(token)
    }

    /// Complete the flow: consume the token (one-time use), enforce the
    /// strength policy on the new credential, and replace the user's
    /// password with its hashed form.
    pub fn confirm(
        &mut self,
        user: &mut User,
        token: &str,
        new_raw: &str,
    ) -> Result<(), ResetError> {
        // Strength check first, so a rejected password leaves the token
        // outstanding and the user can retry
        validate_password(new_raw).map_err(ResetError::WeakPassword)?;

        if !self.store.consume(user.email(), token) {
            log_reset_event("confirm", user.email(), false, Some("invalid or expired token"));
            return Err(ResetError::InvalidToken);
        }

        user.set_password(Password::new(new_raw));
        log_reset_event("confirm", user.email(), true, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MAX_RESET_ATTEMPTS, RESET_URL_BASE};
    use std::cell::RefCell;

    /// Mock capability capturing every (destination, message) pair
    struct MockSender {
        sent: RefCell<Vec<(String, String)>>,
        fail_with: Option<String>,
    }

    impl MockSender {
        fn new() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail_with: Some(reason.to_string()),
            }
        }
    }

    impl NotificationSender for MockSender {
        fn send(&self, destination: &str, message: &str) -> Result<(), String> {
            if let Some(reason) = &self.fail_with {
                return Err(reason.clone());
            }
            self.sent
                .borrow_mut()
                .push((destination.to_string(), message.to_string()));
            Ok(())
        }
    }

    fn test_user() -> User {
        User::new(1, "a@b.com", "555-1234", Password::new("hunter2")).unwrap()
    }

    #[test]
    fn test_reset_sends_exactly_once() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let user = test_user();

        let token = resetter.reset(&user).unwrap();

        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 1);

        // Destination is the user's email, message carries the reset link
        let (destination, message) = &sent[0];
        assert_eq!(destination, "a@b.com");
        assert_eq!(
            message,
            &format!("Seu link: {}?token={}", RESET_URL_BASE, token.token)
        );
        assert!(message.contains("http://techstore.com/reset?token="));
    }

    #[test]
    fn test_reset_with_multibyte_email() {
        // Install a logger so the event-logging arguments on the reset
        // path are evaluated rather than short-circuited
        let log_file = tempfile::NamedTempFile::new().unwrap();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file.path())
            .unwrap();
        let _ = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();

        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);

        // A multibyte address passes validation and must reset cleanly
        let user = User::new(1, "日本@ab.com", "555-1234", Password::new("hunter2")).unwrap();
        resetter.reset(&user).unwrap();

        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "日本@ab.com");
    }

    #[test]
    fn test_reissue_always_produces_fresh_tokens() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let user = test_user();

        let first = resetter.reset(&user).unwrap();
        let second = resetter.reset(&user).unwrap();

        // Two sends, two distinct tokens
        assert_eq!(sender.sent.borrow().len(), 2);
        assert_ne!(first.token, second.token);

        // Only the latest token remains valid
        let mut user = test_user();
        assert!(matches!(
            resetter.confirm(&mut user, &first.token, "Password123!"),
            Err(ResetError::InvalidToken)
        ));
        assert!(resetter.confirm(&mut user, &second.token, "Password123!").is_ok());
    }

    #[test]
    fn test_reuse_outstanding_resends_same_token() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReuseOutstanding);
        let user = test_user();

        let first = resetter.reset(&user).unwrap();
        let second = resetter.reset(&user).unwrap();

        // Both sends carry the same outstanding token
        assert_eq!(first.token, second.token);
        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, sent[1].1);
    }

    #[test]
    fn test_rate_limit_rejects_excess_requests() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let user = test_user();

        for _ in 0..MAX_RESET_ATTEMPTS {
            assert!(resetter.reset(&user).is_ok());
        }

        // Over budget: rejected before any send happens
        match resetter.reset(&user) {
            Err(ResetError::RateLimited(retry_after)) => assert!(retry_after > 0),
            other => panic!("expected RateLimited, got {:?}", other.map(|t| t.token)),
        }
        assert_eq!(sender.sent.borrow().len(), MAX_RESET_ATTEMPTS as usize);
    }

    #[test]
    fn test_delivery_failure_propagates() {
        let sender = MockSender::failing("smtp unreachable");
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let user = test_user();

        match resetter.reset(&user) {
            Err(ResetError::Delivery(reason)) => assert_eq!(reason, "smtp unreachable"),
            other => panic!("expected Delivery, got {:?}", other.map(|t| t.token)),
        }

        // A token that was never delivered must not be consumable
        let mut user = test_user();
        assert!(matches!(
            resetter.confirm(&mut user, "anything", "Password123!"),
            Err(ResetError::InvalidToken)
        ));
    }

    #[test]
    fn test_confirm_replaces_password_once() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let mut user = test_user();

        let token = resetter.reset(&user).unwrap();
        resetter.confirm(&mut user, &token.token, "Password123!").unwrap();

        // Credential replaced with the hashed new password
        assert!(user.password().verify("Password123!"));
        assert!(!user.password().verify("hunter2"));

        // One-time use: the same token cannot confirm twice
        assert!(matches!(
            resetter.confirm(&mut user, &token.token, "Another123!"),
            Err(ResetError::InvalidToken)
        ));
    }

    #[test]
    fn test_confirm_enforces_strength_policy() {
        let sender = MockSender::new();
        let mut resetter = PasswordResetter::new(&sender, ResendPolicy::ReissueAlways);
        let mut user = test_user();

        let token = resetter.reset(&user).unwrap();

        // Weak replacement rejected before the token is touched
        assert!(matches!(
            resetter.confirm(&mut user, &token.token, "weak"),
            Err(ResetError::WeakPassword(PasswordError::TooShort))
        ));
        assert!(user.password().verify("hunter2"));

        // The token survives the failed attempt and a strong retry succeeds
        assert!(resetter.confirm(&mut user, &token.token, "Password123!").is_ok());
        assert!(user.password().verify("Password123!"));
    }
}

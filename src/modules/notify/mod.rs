pub mod smtp;
pub mod templates;

// Re-export the main types and functions
pub use smtp::{SecureEmailManager, SmtpCredentials, SmtpSender};
pub use templates::{reset_link, reset_message};

/// The one capability the reset flow depends on: best-effort delivery
/// of a message string to a destination string. Transport-agnostic --
/// email, SMS, or anything else that fits the signature.
pub trait NotificationSender {
    fn send(&self, destination: &str, message: &str) -> Result<(), String>;
}

use crate::RESET_URL_BASE;

/// Build the reset link for a token
pub fn reset_link(token: &str) -> String {
    format!("{}?token={}", RESET_URL_BASE, token)
}

/// Compose the reset message delivered to the user.
///
/// The "Seu link:" line is the wire format existing consumers parse;
/// keep it stable.
pub fn reset_message(token: &str) -> String {
    format!("Seu link: {}", reset_link(token))
}

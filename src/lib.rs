// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{
    account,
    notify,
    reset,
    utils,
};

// Re-export commonly used types
pub use modules::account::password::Password;
pub use modules::account::user::User;
pub use modules::notify::smtp::SecureEmailManager;
pub use modules::notify::NotificationSender;
pub use modules::reset::resetter::{PasswordResetter, ResendPolicy};
pub use modules::reset::tokens::ResetToken;

// Constants
pub const RESET_URL_BASE: &str = "http://techstore.com/reset";
pub const RESET_TOKEN_DURATION: u64 = 1800;
pub const MAX_RESET_ATTEMPTS: u32 = 3;
pub const RESET_ATTEMPT_WINDOW: u64 = 3600;

// Type aliases
pub type HmacSha256 = hmac::Hmac<sha2::Sha256>;

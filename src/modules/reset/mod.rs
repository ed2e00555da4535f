pub mod resetter;
pub mod store;
pub mod tokens;

// Re-export the main types and functions
pub use resetter::{PasswordResetter, ResendPolicy, ResetError};
pub use store::ResetStore;
pub use tokens::{generate_reset_token, ResetAttemptTracker, ResetToken};

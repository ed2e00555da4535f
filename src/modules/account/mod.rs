pub mod password;
pub mod user;

// Re-export the main types and functions
pub use password::{validate_password, Password, PasswordError};
pub use user::{AccountError, User};

// Declare all modules
pub mod account;
pub mod notify;
pub mod reset;
pub mod utils;

// No re-exports here as they're handled in lib.rs

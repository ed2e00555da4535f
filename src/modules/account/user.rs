use std::fmt;

use super::password::Password;
use crate::modules::utils::io::is_valid_email;

/// Errors reported when entity invariants are violated on construction
/// or mutation
#[derive(Debug, PartialEq)]
pub enum AccountError {
    InvalidEmail,
    EmptyTelephone,
}

/// Represents a single user account with contact details and credential
#[derive(Debug)]
pub struct User {
    id: u64, // Unique identifier, assigned once and never reassigned
    email: String,
    telephone: String,
    password: Password,
}

impl User {
    /// Create a user, validating contact fields at the boundary
    pub fn new(
        id: u64,
        email: impl Into<String>,
        telephone: impl Into<String>,
        password: Password,
    ) -> Result<Self, AccountError> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(AccountError::InvalidEmail);
        }
        let telephone = telephone.into();
        if telephone.trim().is_empty() {
            return Err(AccountError::EmptyTelephone);
        }
        Ok(Self {
            id,
            email,
            telephone,
            password,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Update the contact email, rejecting malformed addresses
    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), AccountError> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(AccountError::InvalidEmail);
        }
        self.email = email;
        Ok(())
    }

    pub fn telephone(&self) -> &str {
        &self.telephone
    }

    pub fn set_telephone(&mut self, telephone: impl Into<String>) -> Result<(), AccountError> {
        let telephone = telephone.into();
        if telephone.trim().is_empty() {
            return Err(AccountError::EmptyTelephone);
        }
        self.telephone = telephone;
        Ok(())
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Replace the credential wholesale
    pub fn set_password(&mut self, password: Password) {
        self.password = password;
    }
}

// Diagnostic rendering only: contact fields, never credential data
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User{{ email: '{}', telephone: '{}' }}",
            self.email, self.telephone
        )
    }
}

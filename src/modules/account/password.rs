use pbkdf2::pbkdf2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

use crate::HmacSha256;

/// Errors reported by the password strength policy
#[derive(Debug)]
pub enum PasswordError {
    TooShort,
    NoUppercase,
    NoLowercase,
    NoNumber,
    NoSpecialChar,
}

/// Function to validate password strength
///
/// Applied when a user chooses a new password (e.g. during reset
/// confirmation), not when wrapping an existing credential.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < 8 {
        return Err(PasswordError::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err(PasswordError::NoNumber);
    }
    if !password
        .chars()
        .any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c))
    {
        return Err(PasswordError::NoSpecialChar);
    }
    Ok(())
}

/// Function to generate a random salt for PBKDF2
pub fn generate_random_salt() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| rng.gen()).collect()
}

/// Function to derive a 32-byte key from a raw credential using PBKDF2
pub fn derive_key_from_passphrase(passphrase: &str, salt: &[u8]) -> Vec<u8> {
    let mut key = vec![0u8; 32];
    let iterations = NonZeroU32::new(100_000).unwrap();

    pbkdf2::<HmacSha256>(
        passphrase.as_bytes(),
        salt,
        iterations.get().into(),
        &mut key,
    );

    key
}

/// The legacy credential transform: plain character reversal.
///
/// Not a hash. Kept only so values stored under the old scheme can be
/// recognized and migrated by [`Password::from_legacy`].
pub fn reverse_transform(raw: &str) -> String {
    raw.chars().rev().collect()
}

/// A hashed credential owned by a [`User`](super::user::User).
///
/// Holds a per-password random salt and the hex-encoded PBKDF2 hash.
/// The raw credential is dropped at construction and never stored,
/// exposed, or serialized.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct Password {
    hash: String,
    salt: Vec<u8>,
}

impl Password {
    /// Wrap a raw credential, deriving its salted hash immediately
    pub fn new(raw: &str) -> Self {
        let salt = generate_random_salt();
        let hash = hex::encode(derive_key_from_passphrase(raw, &salt));
        Self { hash, salt }
    }

    /// The hex-encoded PBKDF2 hash
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The salt the hash was derived with
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Check a candidate credential against the stored hash
    pub fn verify(&self, candidate: &str) -> bool {
        hex::encode(derive_key_from_passphrase(candidate, &self.salt)) == self.hash
    }

    /// Migrate a credential stored under the legacy reversed-string scheme.
    ///
    /// Returns a properly hashed `Password` when `candidate` matches the
    /// stored legacy value, `None` otherwise.
    pub fn from_legacy(stored: &str, candidate: &str) -> Option<Self> {
        if reverse_transform(candidate) == stored {
            Some(Self::new(candidate))
        } else {
            None
        }
    }
}

// Never print credential material, even in debug output
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password").finish_non_exhaustive()
    }
}

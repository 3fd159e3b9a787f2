//! Password hashing port.
//!
//! Hashing is synchronous and CPU-bound; services call it through this trait
//! so tests can substitute a transparent implementation.

/// Errors raised while hashing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The stored hash could not be parsed or a hash could not be produced.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

impl PasswordHashError {
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a candidate against a stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

/// Fixture hasher that stores passwords behind a fixed prefix.
///
/// Only for tests; it performs no key derivation at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "plain$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{FIXTURE_PREFIX}{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        Ok(stored_hash
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|stored| stored == password))
    }
}

//! Credential validation policy port.
//!
//! Registration and profile updates check candidate passwords here before
//! hashing. The default policy mirrors common server-side checks: minimum
//! length, not all digits, not on a short common-password list.

/// Policy checks run against a candidate password.
pub trait PasswordPolicy: Send + Sync {
    /// Return every violation, empty when the password is acceptable.
    fn validate(&self, candidate: &str) -> Vec<String>;
}

const MIN_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "12345678", "123456789", "qwerty123", "letmein1", "iloveyou",
];

/// Default policy used when no custom policy is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPasswordPolicy;

impl PasswordPolicy for DefaultPasswordPolicy {
    fn validate(&self, candidate: &str) -> Vec<String> {
        let mut violations = Vec::new();
        if candidate.chars().count() < MIN_LENGTH {
            violations.push(format!(
                "This password is too short. It must contain at least {MIN_LENGTH} characters."
            ));
        }
        if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_digit()) {
            violations.push("This password is entirely numeric.".to_owned());
        }
        if COMMON_PASSWORDS.contains(&candidate.to_lowercase().as_str()) {
            violations.push("This password is too common.".to_owned());
        }
        violations
    }
}

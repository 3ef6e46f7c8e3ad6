//! Credential checks shared by presentation layers.
//!
//! `ApiClient::login` sends whatever it is given; rejecting obviously
//! malformed input before a request goes out is the caller's job. These
//! helpers exist so every frontend rejects the same inputs with the
//! same errors.

use crate::models::LoginCredentials;
use thiserror::Error;

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a credentials pair is rejected before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
}

impl LoginCredentials {
    /// Check the pair against the backend's signup rules.
    ///
    /// The email check is structural only: one `@`, a non-empty local
    /// part, and a dotted domain. Whether the address exists is the
    /// backend's problem.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if !is_valid_email(&self.email) {
            return Err(CredentialsError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // The domain needs an interior dot: "user@localhost" is rejected.
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

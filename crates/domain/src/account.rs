//! Account — a dashboard user owning overlay and ledger rows.
//!
//! Credential issuance and verification live in an external auth layer; the
//! credential hash stored here is an opaque string.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::AccountId;
use crate::time::Timestamp;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique login name, at least two characters.
    pub username: String,
    /// Unique email, stored lowercased so uniqueness is case-insensitive.
    pub email: String,
    /// Opaque credential hash produced by the external auth layer.
    #[serde(skip_serializing)]
    pub credential_hash: String,
    /// Registration time.
    pub created_at: Timestamp,
}

impl Account {
    /// Build a new account, normalizing the email to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the username is shorter than two
    /// characters or the email is empty.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let username = username.into().trim().to_string();
        let email = email.into().trim().to_lowercase();
        validate_username(&username)?;
        validate_email(&email)?;
        Ok(Self {
            id: AccountId::new(),
            username,
            email,
            credential_hash: credential_hash.into(),
            created_at,
        })
    }
}

/// Check the username invariant (at least two characters).
///
/// # Errors
///
/// Returns [`ValidationError::UsernameTooShort`] on violation.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < 2 {
        return Err(ValidationError::UsernameTooShort);
    }
    Ok(())
}

/// Check the email invariant (non-empty).
///
/// # Errors
///
/// Returns [`ValidationError::EmptyEmail`] on violation.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    Ok(())
}

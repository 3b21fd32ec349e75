//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HearthError`]
//! via `#[from]` (adapters wrap theirs into [`HearthError::Storage`]).

/// Top-level error for all hearth operations.
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An adapter-level failure (database, bus, …).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Username is missing or shorter than two characters.
    #[error("username must be at least 2 characters")]
    UsernameTooShort,

    /// Email is empty.
    #[error("email must not be empty")]
    EmptyEmail,

    /// Another account already uses this username.
    #[error("username already taken")]
    UsernameTaken,

    /// Another account already uses this email.
    #[error("email already taken")]
    EmailTaken,

    /// Device id is empty or otherwise unusable.
    #[error("invalid device id")]
    InvalidDeviceId,
}

/// A record lookup that came up empty.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of record (e.g. `"Account"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Account",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Account not found: abc");
    }

    #[test]
    fn should_convert_validation_error_into_hearth_error() {
        let err: HearthError = ValidationError::UsernameTooShort.into();
        assert!(matches!(err, HearthError::Validation(_)));
    }
}

//! Error types for the client flows.

use thiserror::Error;

/// Result type alias for flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// A failed form rule.
///
/// The `Display` text is the message shown to the user. Rules are checked in
/// a fixed order and only the first failure is reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// First name left empty.
    #[error("First name is required.")]
    FirstNameRequired,

    /// Last name left empty.
    #[error("Last name is required.")]
    LastNameRequired,

    /// Email left empty.
    #[error("Email is required.")]
    EmailRequired,

    /// Email does not look like `local@domain.tld`.
    #[error("Provide a valid email address.")]
    InvalidEmail,

    /// Password left empty.
    #[error("Password is required.")]
    PasswordRequired,

    /// Password shorter than the configured minimum.
    #[error("Password must be at least {min_length} characters.")]
    PasswordTooShort {
        /// Minimum number of characters
        min_length: usize,
    },

    /// Password lacks a letter or a digit.
    #[error("Password must contain at least one letter and one number.")]
    PasswordComposition,

    /// Confirmation left empty.
    #[error("Please confirm your password.")]
    ConfirmPasswordRequired,

    /// Confirmation differs from the password.
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Birthday left empty.
    #[error("Birthday is required.")]
    BirthdayRequired,
}

/// Errors produced by the flows and their ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    // ═══════════════════════════════════════════════════════════
    // User Errors
    // ═══════════════════════════════════════════════════════════

    /// A form rule failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The simulated backend does not know the account.
    #[error("Email/password combo is not associated with an account.")]
    AccountNotFound,

    /// The entered verification code does not match.
    #[error("Invalid code.")]
    InvalidCode,

    // ═══════════════════════════════════════════════════════════
    // Port Errors
    // ═══════════════════════════════════════════════════════════

    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The navigator rejected a transition.
    #[error("Navigation error: {0}")]
    Navigation(String),

    // ═══════════════════════════════════════════════════════════
    // Internal
    // ═══════════════════════════════════════════════════════════

    /// Internal error (lock poisoning and the like).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Returns `true` if the user can fix this error by changing their input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use octomarket_auth::error::{FlowError, ValidationError};
    /// assert!(FlowError::InvalidCode.is_user_error());
    /// assert!(FlowError::from(ValidationError::EmailRequired).is_user_error());
    /// assert!(!FlowError::Storage("disk full".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::AccountNotFound | Self::InvalidCode
        )
    }
}

/// Configuration loading or validation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::PasswordTooShort { min_length: 8 }.to_string(),
            "Password must be at least 8 characters."
        );
        assert_eq!(
            FlowError::from(ValidationError::PasswordMismatch).to_string(),
            "Passwords do not match."
        );
    }

    #[test]
    fn test_port_errors_are_not_user_errors() {
        assert!(!FlowError::Navigation("no route".into()).is_user_error());
        assert!(!FlowError::Internal("poisoned".into()).is_user_error());
        assert!(FlowError::AccountNotFound.is_user_error());
    }
}

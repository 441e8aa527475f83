//! User validation utilities

use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID must be an integer, got {found}")]
    IdNotInteger { found: &'static str },

    #[error("User name must be a string, got {found}")]
    NameNotString { found: &'static str },

    #[error("User email must be a string, got {found}")]
    EmailNotString { found: &'static str },

    #[error("User ID must be a positive integer, got {0}")]
    NonPositiveId(i64),

    #[error("User ID {0} is out of range")]
    IdOutOfRange(String),

    #[error("User name cannot be empty or whitespace only")]
    EmptyName,

    #[error(
        "User name contains disallowed characters: '{0}'. Only letters, spaces, hyphens, apostrophes, and periods are allowed"
    )]
    InvalidNameCharacters(String),

    #[error("User name length cannot be less than {min}, got {length}")]
    NameTooShort { length: usize, min: usize },

    #[error("User name length cannot be longer than {max}, got {length}")]
    NameTooLong { length: usize, max: usize },

    #[error("User email cannot be empty")]
    EmptyEmail,

    #[error("User email '{0}' is not a valid email address")]
    InvalidEmailFormat(String),
}

impl UserValidationError {
    /// Type mismatches (as opposed to out-of-range values)
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::IdNotInteger { .. } | Self::NameNotString { .. } | Self::EmailNotString { .. }
        )
    }
}

pub const MIN_NAME_LENGTH: usize = 4;
pub const MAX_NAME_LENGTH: usize = 70;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z .'-]+$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

/// Validate a user ID
///
/// Rules:
/// - Must be strictly positive
pub fn validate_user_id(id: i64) -> Result<(), UserValidationError> {
    if id < 1 {
        return Err(UserValidationError::NonPositiveId(id));
    }

    Ok(())
}

/// Validate a user name and return it trimmed
///
/// Rules (applied to the trimmed value):
/// - Cannot be empty
/// - Only ASCII letters, spaces, hyphens, apostrophes and periods
/// - Between 4 and 70 characters
pub fn clean_name(name: &str) -> Result<String, UserValidationError> {
    let cleaned = name.trim();

    if cleaned.is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if !NAME_PATTERN.is_match(cleaned) {
        return Err(UserValidationError::InvalidNameCharacters(
            cleaned.to_string(),
        ));
    }

    // Only ASCII survives the pattern, so bytes == characters here
    let length = cleaned.len();

    if length < MIN_NAME_LENGTH {
        return Err(UserValidationError::NameTooShort {
            length,
            min: MIN_NAME_LENGTH,
        });
    }

    if length > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong {
            length,
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(cleaned.to_string())
}

/// Validate an email address for presence only
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    Ok(())
}

/// Format rule for email addresses applied on top of the core checks
pub trait EmailPolicy: Send + Sync + Debug {
    fn check(&self, email: &str) -> Result<(), UserValidationError>;
}

/// Accepts any non-empty address
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveEmailPolicy;

impl EmailPolicy for PermissiveEmailPolicy {
    fn check(&self, email: &str) -> Result<(), UserValidationError> {
        validate_email(email)
    }
}

/// Requires a `local@domain.tld` shaped address
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictEmailPolicy;

impl EmailPolicy for StrictEmailPolicy {
    fn check(&self, email: &str) -> Result<(), UserValidationError> {
        validate_email(email)?;

        if !EMAIL_PATTERN.is_match(email) {
            return Err(UserValidationError::InvalidEmailFormat(email.to_string()));
        }

        Ok(())
    }
}

/// Configurable selector for the email policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailPolicyKind {
    Permissive,
    #[default]
    Strict,
}

impl EmailPolicyKind {
    pub fn build(self) -> Arc<dyn EmailPolicy> {
        match self {
            Self::Permissive => Arc::new(PermissiveEmailPolicy),
            Self::Strict => Arc::new(StrictEmailPolicy),
        }
    }
}

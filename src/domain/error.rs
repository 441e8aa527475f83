use std::path::PathBuf;

use thiserror::Error;

use crate::domain::user::{UserId, UserValidationError};

/// Core domain errors
///
/// One variant per failure kind so that callers (the HTTP layer in particular)
/// can branch on the kind instead of parsing messages.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid type: {message}")]
    InvalidType { message: String },

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("User with ID {id} already exists")]
    DuplicateUser { id: UserId },

    #[error("User with ID {id} not found")]
    UserNotFound { id: i64 },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Malformed JSON in {}: {source}", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Root of JSON file {} is not an object, got {found}", path.display())]
    InvalidFormat { path: PathBuf, found: &'static str },

    #[error("Failed to read data file {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write data file {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize users for {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::InvalidType {
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    pub fn duplicate_user(id: UserId) -> Self {
        Self::DuplicateUser { id }
    }

    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error was raised by `User` construction
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::InvalidValue { .. })
    }

    /// Whether this error comes from the snapshot file rather than the caller
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::MalformedJson { .. }
                | Self::InvalidFormat { .. }
                | Self::IoFailure { .. }
                | Self::WriteFailure { .. }
                | Self::Serialization { .. }
        )
    }
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        if err.is_type_error() {
            Self::invalid_type(err.to_string())
        } else {
            Self::invalid_value(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_user_error() {
        let error = DomainError::duplicate_user(UserId::new(1).unwrap());
        assert_eq!(error.to_string(), "User with ID 1 already exists");
    }

    #[test]
    fn test_user_not_found_error() {
        let error = DomainError::user_not_found(10);
        assert_eq!(error.to_string(), "User with ID 10 not found");
    }

    #[test]
    fn test_validation_error_conversion() {
        let type_err: DomainError = UserValidationError::NameNotString { found: "array" }.into();
        assert!(matches!(type_err, DomainError::InvalidType { .. }));

        let value_err: DomainError = UserValidationError::NonPositiveId(0).into();
        assert!(matches!(value_err, DomainError::InvalidValue { .. }));
        assert!(value_err.is_validation());
        assert!(!value_err.is_io());
    }

    #[test]
    fn test_file_not_found_is_io() {
        let error = DomainError::FileNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert!(error.is_io());
        assert_eq!(error.to_string(), "File not found: missing.json");
    }
}

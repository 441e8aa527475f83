//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::{DomainError, UserValidationError};

/// Error categories reported in the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ValidationError,
    NotFoundError,
    ConflictError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: StatusCode,
        error_type: ApiErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Malformed request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// Well-formed request whose content failed validation
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::ValidationError,
            message,
        )
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Conflict with the current state of the store
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            warn!(error = %err, "Validation failed");
            return Self::unprocessable(format!("User validation failed: {}", err));
        }

        if err.is_io() {
            error!(error = %err, "Snapshot file operation failed");
            return Self::internal(err.to_string()).with_code("storage_error");
        }

        match &err {
            DomainError::DuplicateUser { .. } => {
                warn!(error = %err, "Duplicate user");
                Self::conflict(err.to_string())
            }
            DomainError::UserNotFound { .. } => {
                warn!(error = %err, "User not found");
                Self::not_found(err.to_string())
            }
            _ => {
                error!(error = %err, "Request failed");
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<UserValidationError> for ApiError {
    fn from(err: UserValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid id");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.message, "Invalid id");
    }

    #[test]
    fn test_domain_error_conversion() {
        let duplicate: ApiError = DomainError::duplicate_user(UserId::new(1).unwrap()).into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);
        assert_eq!(duplicate.response.error.message, "User with ID 1 already exists");

        let missing: ApiError = DomainError::user_not_found(10).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.response.error.error_type, ApiErrorType::NotFoundError);

        let invalid: ApiError = DomainError::invalid_value("bad name").into();
        assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);

        let internal: ApiError = DomainError::internal("poisoned").into();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_snapshot_error_conversion() {
        let err: ApiError = DomainError::FileNotFound {
            path: std::path::PathBuf::from("data/users.json"),
        }
        .into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response.error.error_type, ApiErrorType::ServerError);
        assert_eq!(err.response.error.code.as_deref(), Some("storage_error"));

        let internal: ApiError = DomainError::internal("poisoned").into();
        assert!(internal.response.error.code.is_none());
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: ApiError = UserValidationError::EmptyEmail.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.response.error.message,
            "User validation failed: Invalid value: User email cannot be empty"
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::conflict("User with ID 1 already exists").with_code("duplicate_user");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("\"type\":\"conflict_error\""));
        assert!(json.contains("\"code\":\"duplicate_user\""));
    }
}

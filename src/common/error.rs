// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::{SchemaError, ValidateError, ValidationFailure, Violation};

const INTERNAL_ERROR_MESSAGE: &str = "There is an error on our servers, please try again later";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    ValidationError(ValidationFailure),
    Conflict(String),
    InternalServer(String),
    SchemaError(SchemaError),
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(failure) => write!(f, "Validation Error: {}", failure),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::SchemaError(e) => write!(f, "Schema Error: {}", e),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
        }
    }
}

impl ApiError {
    /// Attaches the user-facing name of the operation that failed
    pub fn during(self, action: &'static str) -> ActionError {
        ActionError {
            action,
            error: self,
        }
    }

    fn into_parts(self) -> (StatusCode, String, &'static str, Option<Vec<Violation>>) {
        match self {
            ApiError::ValidationError(failure) => (
                StatusCode::BAD_REQUEST,
                failure.aggregated_message(),
                "VALIDATION_ERROR",
                Some(failure.violations().to_vec()),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT", None),
            ApiError::InternalServer(msg) => {
                error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    "INTERNAL_SERVER_ERROR",
                    None,
                )
            }
            ApiError::SchemaError(e) => {
                error!(error = %e, "Validation schema is misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    "SCHEMA_ERROR",
                    None,
                )
            }
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    "DATABASE_ERROR",
                    None,
                )
            }
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_message: Option<String>,
    pub error_message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code, violations) = self.into_parts();

        let error_response = ErrorResponse {
            main_message: None,
            error_message,
            code: code.to_string(),
            violations,
        };

        (status, Json(error_response)).into_response()
    }
}

/// An [`ApiError`] tagged with the operation it interrupted
#[derive(Debug)]
pub struct ActionError {
    pub action: &'static str,
    pub error: ApiError,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action, self.error)
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code, violations) = self.error.into_parts();

        let error_response = ErrorResponse {
            main_message: Some(self.action.to_string()),
            error_message,
            code: code.to_string(),
            violations,
        };

        (status, Json(error_response)).into_response()
    }
}

/// User-input violations become 400s; a broken schema stays an internal error
impl From<ValidateError> for ApiError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::Invalid(failure) => ApiError::ValidationError(failure),
            ValidateError::Schema(e) => ApiError::SchemaError(e),
        }
    }
}

/// True when an insert hit a UNIQUE constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

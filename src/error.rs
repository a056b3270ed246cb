use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::DatabaseError;
use crate::filter::FilterError;
use crate::services::ServiceError;

/// Error returned by every handler. Serialized as `{"error", "code"}` plus
/// `field_errors` for validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    ValidationError {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("{0}")]
    InvalidJson(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "INVALID_JSON"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    pub fn error_code(&self) -> &'static str {
        self.status_and_code().1
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": self.to_string(),
            "code": self.error_code(),
        });
        if let ApiError::ValidationError { field_errors, .. } = self {
            body["field_errors"] = json!(field_errors);
        }
        body
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Validation failure attributed to a single field
    pub fn field_error(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::ValidationError {
            field_errors: HashMap::from([(field.to_string(), message.clone())]),
            message,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => ApiError::field_error(field, message),
            ServiceError::InvalidCredentials
            | ServiceError::InvalidToken
            | ServiceError::TokenOwnershipMismatch
            | ServiceError::TokenExpired => ApiError::unauthorized(err.to_string()),
            ServiceError::NotFound(_) | ServiceError::OwnerNotFound => {
                ApiError::not_found(err.to_string())
            }
            ServiceError::DuplicateEmail => ApiError::conflict(err.to_string()),
            ServiceError::Database(db) => db.into(),
            ServiceError::Password(e) => {
                tracing::error!("Password hashing error: {}", e);
                ApiError::internal("An error occurred while processing your request")
            }
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ForeignKeyViolation(constraint) => {
                tracing::debug!("Foreign key violation on {}", constraint);
                ApiError::bad_request("referenced record does not exist")
            }
            DatabaseError::CheckViolation(constraint) => {
                tracing::debug!("Check violation on {}", constraint);
                ApiError::bad_request("record violates a data constraint")
            }
            DatabaseError::UniqueViolation(constraint) => {
                tracing::debug!("Unique violation on {}", constraint);
                ApiError::conflict("record already exists")
            }
            DatabaseError::BatchItem { index, source } => {
                tracing::error!("Batch insert failed at item {}: {}", index, source);
                ApiError::internal(format!(
                    "Batch insert failed at item {index}; no rows were saved"
                ))
            }
            DatabaseError::Timeout(op) => {
                tracing::error!("Database call {} timed out", op);
                ApiError::internal("Request processing timed out")
            }
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::internal("Database error occurred")
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::field_error(err.field(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

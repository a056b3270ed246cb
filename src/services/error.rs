use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;

/// Domain failures raised by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid refresh token")]
    InvalidToken,

    #[error("refresh token does not belong to this user")]
    TokenOwnershipMismatch,

    #[error("refresh token has expired")]
    TokenExpired,

    /// Covers both absence and rows owned by someone else
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("user not found")]
    OwnerNotFound,

    #[error("email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

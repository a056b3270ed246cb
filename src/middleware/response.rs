use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Handler output. Records are serialized bare, without a wrapper object.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub body: T,
    pub status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(body: T) -> Self {
        Self::with_status(body, StatusCode::OK)
    }

    pub fn with_status(body: T, status: StatusCode) -> Self {
        Self { body, status }
    }

    pub fn created(body: T) -> Self {
        Self::with_status(body, StatusCode::CREATED)
    }
}

impl ApiResponse<()> {
    /// Deletes answer with an empty 204
    pub fn no_content() -> Self {
        Self::with_status((), StatusCode::NO_CONTENT)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.status {
            StatusCode::NO_CONTENT => StatusCode::NO_CONTENT.into_response(),
            status => (status, Json(self.body)).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

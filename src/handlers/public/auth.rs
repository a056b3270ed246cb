// handlers/public/auth.rs - POST /auth/login

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TokenPair;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - Exchange email and password for an access/refresh token pair
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenPair> {
    let Json(request) = payload?;

    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    let tokens = state.services.auth.login(&email, password).await?;
    Ok(ApiResponse::success(tokens))
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::field_error(field, format!("{field} is required"))),
    }
}

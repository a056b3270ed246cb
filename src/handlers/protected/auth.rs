// handlers/protected/auth.rs - /auth/refresh and /auth/logout

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: Option<String>,
}

impl TokenRequest {
    fn into_token(self) -> Result<String, ApiError> {
        self.token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::field_error("token", "token is required"))
    }
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// GET|POST /auth/refresh - Mint a new access token from a stored refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<AccessTokenResponse> {
    let Json(request) = payload?;
    let token = request.into_token()?;

    let access_token = state.services.auth.refresh(user.user_id, &token).await?;
    Ok(ApiResponse::success(AccessTokenResponse { access_token }))
}

/// POST /auth/logout - Revoke one of the caller's refresh tokens
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<()> {
    let Json(request) = payload?;
    let token = request.into_token()?;

    state.services.auth.logout(user.user_id, &token).await?;
    Ok(ApiResponse::no_content())
}

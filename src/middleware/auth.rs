use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{Claims, TokenKind};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

/// JWT authentication middleware that validates access tokens and injects
/// the caller's identity into the request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = state
        .tokens
        .verify(token, TokenKind::Access)
        .map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

    // Convert claims to AuthUser and inject into request
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(token.trim()),
        None => Err("Authorization header must use Bearer token format"),
    }
}

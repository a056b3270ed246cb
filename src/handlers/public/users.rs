// handlers/public/users.rs - POST /users (alias POST /signup)

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::UserCandidate;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub id: Uuid,
}

/**
 * POST /users - Register a new account
 *
 * Expected Input:
 * ```json
 * {
 *   "username": "alice",
 *   "first_name": "Alice",
 *   "last_name": "Liddell",
 *   "email": "alice@example.com",
 *   "password": "abc12345"
 * }
 * ```
 *
 * 201 `{ "message": "user created", "id": "<uuid>" }`,
 * 400 on validation failure, 409 when the email is taken.
 */
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserCandidate>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let Json(candidate) = payload?;
    let user = state.services.users.register(candidate).await?;

    Ok(ApiResponse::created(RegisterResponse {
        message: "user created",
        id: user.id,
    }))
}

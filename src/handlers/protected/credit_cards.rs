// handlers/protected/credit_cards.rs - /credit-cards

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::CreditCard;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::credit_card_service::CardInput;

#[derive(Debug, Deserialize)]
pub struct CreditCardRequest {
    #[serde(default)]
    pub card_name: String,
    pub total_limit: f64,
    pub current_limit: Option<f64>,
    pub due_date: i32,
}

impl From<CreditCardRequest> for CardInput {
    fn from(req: CreditCardRequest) -> Self {
        CardInput {
            card_name: req.card_name,
            total_limit: req.total_limit,
            current_limit: req.current_limit,
            due_date: req.due_date,
        }
    }
}

/// GET /credit-cards
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<CreditCard>> {
    let cards = state.services.credit_cards.list(user.user_id).await?;
    Ok(ApiResponse::success(cards))
}

/// GET /credit-cards/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CreditCard> {
    let Path(id) = id?;
    let card = state.services.credit_cards.get(id, user.user_id).await?;
    Ok(ApiResponse::success(card))
}

/// POST /credit-cards
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreditCardRequest>, JsonRejection>,
) -> ApiResult<CreditCard> {
    let Json(request) = payload?;
    let card = state
        .services
        .credit_cards
        .create(user.user_id, request.into())
        .await?;
    Ok(ApiResponse::created(card))
}

/// DELETE /credit-cards/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.services.credit_cards.delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}

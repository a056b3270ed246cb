// handlers/protected/categories.rs - /category

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Category;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /category - The caller's categories plus the global ones
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Category>> {
    let categories = state.services.categories.list(user.user_id).await?;
    Ok(ApiResponse::success(categories))
}

/// POST /category - `{ "name": "Groceries" }`
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Category> {
    let Json(request) = payload?;
    let category = state
        .services
        .categories
        .create(user.user_id, &request.name)
        .await?;
    Ok(ApiResponse::created(category))
}

/// DELETE /category/:id - Only categories the caller owns can be removed
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.services.categories.delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}

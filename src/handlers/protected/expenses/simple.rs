// handlers/protected/expenses/simple.rs - /expenses/simple

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::resolve_update_id;
use crate::app::AppState;
use crate::database::models::{NewSimpleExpense, SimpleExpense, SimpleExpensePatch, SimpleExpenseSummary};
use crate::filter::{ExpenseQuery, SummaryQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct SimpleExpenseRequest {
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Partial body for PUT; absent or zero fields stay unchanged
#[derive(Debug, Default, Deserialize)]
pub struct SimpleExpenseUpdate {
    pub id: Option<Uuid>,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// GET /expenses/simple
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> ApiResult<Vec<SimpleExpense>> {
    let Query(query) = query?;
    let filters = query.into_simple(&state.config.filter)?;
    let expenses = state
        .services
        .simple_expenses
        .list(user.user_id, &filters)
        .await?;
    Ok(ApiResponse::success(expenses))
}

/// POST /expenses/simple
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SimpleExpenseRequest>, JsonRejection>,
) -> ApiResult<SimpleExpense> {
    let Json(req) = payload?;
    let expense = state
        .services
        .simple_expenses
        .create(NewSimpleExpense {
            user_id: user.user_id,
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date,
        })
        .await?;
    Ok(ApiResponse::created(expense))
}

/// PUT /expenses/simple - id in the body
pub async fn update(
    state: State<AppState>,
    user: Extension<AuthUser>,
    payload: Result<Json<SimpleExpenseUpdate>, JsonRejection>,
) -> ApiResult<SimpleExpense> {
    apply_update(state, user, None, payload).await
}

/// PUT /expenses/simple/:id
pub async fn update_by_id(
    state: State<AppState>,
    user: Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SimpleExpenseUpdate>, JsonRejection>,
) -> ApiResult<SimpleExpense> {
    let Path(id) = id?;
    apply_update(state, user, Some(id), payload).await
}

async fn apply_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path_id: Option<Uuid>,
    payload: Result<Json<SimpleExpenseUpdate>, JsonRejection>,
) -> ApiResult<SimpleExpense> {
    let Json(req) = payload?;
    let id = resolve_update_id(path_id, req.id)?;

    let expense = state
        .services
        .simple_expenses
        .update(SimpleExpensePatch {
            id,
            user_id: user.user_id,
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date,
        })
        .await?;
    Ok(ApiResponse::success(expense))
}

/// GET /expenses/simple/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<SimpleExpense> {
    let Path(id) = id?;
    let expense = state
        .services
        .simple_expenses
        .get_by_id(id, user.user_id)
        .await?;
    Ok(ApiResponse::success(expense))
}

/// DELETE /expenses/simple/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.services.simple_expenses.delete(id, user.user_id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /expenses/simple/summary?start_date=&end_date=
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<SimpleExpenseSummary> {
    let Query(query) = query?;
    let summary = state
        .services
        .simple_expenses
        .summary(user.user_id, query.into_range()?)
        .await?;
    Ok(ApiResponse::success(summary))
}

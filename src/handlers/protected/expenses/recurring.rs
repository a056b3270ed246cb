// handlers/protected/expenses/recurring.rs - /expenses/recurring

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
use crate::database::models::{
    Frequency, NewRecurringExpense, RecurringExpense, RecurringExpensePatch, RecurringExpenseSummary,
    RecurringOccurrence,
};
use crate::error::ApiError;
use crate::filter::{ExpenseQuery, SummaryQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct RecurringExpenseRequest {
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    /// Defaults to `start_date`
    pub date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Frequency,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecurringExpenseUpdate {
    pub id: Option<Uuid>,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub target_date: Option<NaiveDate>,
}

/// GET /expenses/recurring
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> ApiResult<Vec<RecurringExpense>> {
    let Query(query) = query?;
    let filters = query.into_recurring(&state.config.filter)?;
    let expenses = state
        .services
        .recurring_expenses
        .list(user.user_id, &filters)
        .await?;
    Ok(ApiResponse::success(expenses))
}

/// POST /expenses/recurring
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<RecurringExpenseRequest>, JsonRejection>,
) -> ApiResult<RecurringExpense> {
    let Json(req) = payload?;
    let expense = state
        .services
        .recurring_expenses
        .create(NewRecurringExpense {
            user_id: user.user_id,
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date.unwrap_or(req.start_date),
            card_id: req.card_id.filter(|id| !id.is_nil()),
            start_date: req.start_date,
            end_date: req.end_date,
            frequency: req.frequency,
        })
        .await?;
    Ok(ApiResponse::created(expense))
}

/// PUT /expenses/recurring - id in the body
pub async fn update(
    state: State<AppState>,
    user: Extension<AuthUser>,
    payload: Result<Json<RecurringExpenseUpdate>, JsonRejection>,
) -> ApiResult<RecurringExpense> {
    apply_update(state, user, None, payload).await
}

/// PUT /expenses/recurring/:id
pub async fn update_by_id(
    state: State<AppState>,
    user: Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RecurringExpenseUpdate>, JsonRejection>,
) -> ApiResult<RecurringExpense> {
    let Path(id) = id?;
    apply_update(state, user, Some(id), payload).await
}

async fn apply_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path_id: Option<Uuid>,
    payload: Result<Json<RecurringExpenseUpdate>, JsonRejection>,
) -> ApiResult<RecurringExpense> {
    let Json(req) = payload?;
    let id = resolve_update_id(path_id, req.id)?;

    let expense = state
        .services
        .recurring_expenses
        .update(RecurringExpensePatch {
            id,
            user_id: user.user_id,
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date,
            card_id: req.card_id,
            start_date: req.start_date,
            end_date: req.end_date,
            frequency: req.frequency,
        })
        .await?;
    Ok(ApiResponse::success(expense))
}

/// GET /expenses/recurring/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<RecurringExpense> {
    let Path(id) = id?;
    let expense = state
        .services
        .recurring_expenses
        .get_by_id(id, user.user_id)
        .await?;
    Ok(ApiResponse::success(expense))
}

/// DELETE /expenses/recurring/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state
        .services
        .recurring_expenses
        .delete(id, user.user_id)
        .await?;
    Ok(ApiResponse::no_content())
}

/// GET /expenses/recurring/summary?start_date=&end_date=
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<RecurringExpenseSummary> {
    let Query(query) = query?;
    let summary = state
        .services
        .recurring_expenses
        .summary(user.user_id, query.into_range()?)
        .await?;
    Ok(ApiResponse::success(summary))
}

/// POST /expenses/recurring/generate?target_date=YYYY-MM-DD
///
/// Materializes every occurrence due up to the target date. Calling it again
/// with the same date creates nothing new.
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<GenerateQuery>, QueryRejection>,
) -> ApiResult<Vec<RecurringOccurrence>> {
    let Query(query) = query?;
    let target = query
        .target_date
        .ok_or_else(|| ApiError::field_error("target_date", "target_date is required"))?;

    let occurrences = state
        .services
        .recurring_expenses
        .generate(user.user_id, target)
        .await?;
    Ok(ApiResponse::created(occurrences))
}

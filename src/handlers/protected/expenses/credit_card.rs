// handlers/protected/expenses/credit_card.rs - /expenses/credit-card

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
use crate::database::models::{CreditCardExpense, CreditCardExpensePatch, CreditCardExpenseSummary};
use crate::filter::{ExpenseQuery, SummaryQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::credit_card_expense_service::PurchaseInput;

#[derive(Debug, Deserialize)]
pub struct CreditCardExpenseRequest {
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Uuid,
    pub installment_amount: Option<f64>,
    pub installments_number: Option<i32>,
}

impl From<CreditCardExpenseRequest> for PurchaseInput {
    fn from(req: CreditCardExpenseRequest) -> Self {
        PurchaseInput {
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date,
            card_id: req.card_id,
            installment_amount: req.installment_amount,
            installments_number: req.installments_number,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreditCardExpenseUpdate {
    pub id: Option<Uuid>,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
    pub installment_amount: Option<f64>,
    pub installments_number: Option<i32>,
}

/// GET /expenses/credit-card
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> ApiResult<Vec<CreditCardExpense>> {
    let Query(query) = query?;
    let filters = query.into_credit_card(&state.config.filter)?;
    let expenses = state
        .services
        .credit_card_expenses
        .list(user.user_id, &filters)
        .await?;
    Ok(ApiResponse::success(expenses))
}

/// POST /expenses/credit-card
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreditCardExpenseRequest>, JsonRejection>,
) -> ApiResult<CreditCardExpense> {
    let Json(req) = payload?;
    let expense = state
        .services
        .credit_card_expenses
        .create(user.user_id, req.into())
        .await?;
    Ok(ApiResponse::created(expense))
}

/// PUT /expenses/credit-card - id in the body
pub async fn update(
    state: State<AppState>,
    user: Extension<AuthUser>,
    payload: Result<Json<CreditCardExpenseUpdate>, JsonRejection>,
) -> ApiResult<CreditCardExpense> {
    apply_update(state, user, None, payload).await
}

/// PUT /expenses/credit-card/:id
pub async fn update_by_id(
    state: State<AppState>,
    user: Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreditCardExpenseUpdate>, JsonRejection>,
) -> ApiResult<CreditCardExpense> {
    let Path(id) = id?;
    apply_update(state, user, Some(id), payload).await
}

async fn apply_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path_id: Option<Uuid>,
    payload: Result<Json<CreditCardExpenseUpdate>, JsonRejection>,
) -> ApiResult<CreditCardExpense> {
    let Json(req) = payload?;
    let id = resolve_update_id(path_id, req.id)?;

    let expense = state
        .services
        .credit_card_expenses
        .update(CreditCardExpensePatch {
            id,
            user_id: user.user_id,
            category_id: req.category_id,
            amount: req.amount,
            description: req.description,
            date: req.date,
            card_id: req.card_id,
            installment_amount: req.installment_amount,
            installments_number: req.installments_number,
        })
        .await?;
    Ok(ApiResponse::success(expense))
}

/// GET /expenses/credit-card/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CreditCardExpense> {
    let Path(id) = id?;
    let expense = state
        .services
        .credit_card_expenses
        .get_by_id(id, user.user_id)
        .await?;
    Ok(ApiResponse::success(expense))
}

/// DELETE /expenses/credit-card/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state
        .services
        .credit_card_expenses
        .delete(id, user.user_id)
        .await?;
    Ok(ApiResponse::no_content())
}

/// GET /expenses/credit-card/summary?start_date=&end_date=
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<CreditCardExpenseSummary> {
    let Query(query) = query?;
    let summary = state
        .services
        .credit_card_expenses
        .summary(user.user_id, query.into_range()?)
        .await?;
    Ok(ApiResponse::success(summary))
}

/// POST /expenses/credit-card/installments/generate
///
/// Same body as create; the purchase is stored as one row per monthly
/// installment.
pub async fn generate_installments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreditCardExpenseRequest>, JsonRejection>,
) -> ApiResult<Vec<CreditCardExpense>> {
    let Json(req) = payload?;
    let rows = state
        .services
        .credit_card_expenses
        .generate_installments(user.user_id, req.into())
        .await?;
    Ok(ApiResponse::created(rows))
}

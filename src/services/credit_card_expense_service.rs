use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::{
    CreditCardExpense, CreditCardExpensePatch, CreditCardExpenseSummary, NewCreditCardExpense,
};
use crate::database::repository::CreditCardExpenseRepository;
use crate::filter::{CreditCardExpenseFilters, DateRange};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::schedule::{installment_dates, round_cents, split_installments};
use crate::services::{owned_by, require_positive_amount};

const WHAT: &str = "credit card expense";

/// Thirty years of monthly payments
pub const MAX_INSTALLMENTS: i32 = 360;

/// Purchase as submitted; installment fields fall back to a single payment
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Uuid,
    pub installment_amount: Option<f64>,
    pub installments_number: Option<i32>,
}

pub struct CreditCardExpenseService {
    expenses: Arc<dyn CreditCardExpenseRepository>,
}

impl CreditCardExpenseService {
    pub fn new(expenses: Arc<dyn CreditCardExpenseRepository>) -> Self {
        Self { expenses }
    }

    pub async fn create(&self, user_id: Uuid, input: PurchaseInput) -> ServiceResult<CreditCardExpense> {
        let expense = validate(user_id, input)?;
        Ok(self.expenses.insert(expense).await?)
    }

    pub async fn update(&self, patch: CreditCardExpensePatch) -> ServiceResult<CreditCardExpense> {
        let patch = patch.normalized();
        if let Some(amount) = patch.amount {
            require_positive_amount(amount)?;
        }
        if let Some(amount) = patch.installment_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ServiceError::validation(
                    "installment_amount",
                    "installment amount must be zero or greater",
                ));
            }
        }
        if let Some(n) = patch.installments_number {
            check_installments(n)?;
        }
        self.expenses
            .update(patch)
            .await?
            .ok_or(ServiceError::NotFound(WHAT))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let expense = self.get_by_id(id, user_id).await?;
        self.expenses.delete(expense.id).await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> ServiceResult<CreditCardExpense> {
        owned_by(self.expenses.find_by_id(id).await?, user_id, WHAT)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filters: &CreditCardExpenseFilters,
    ) -> ServiceResult<Vec<CreditCardExpense>> {
        Ok(self.expenses.find_by_filter(user_id, filters).await?)
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> ServiceResult<CreditCardExpenseSummary> {
        let expenses = self.expenses.find_by_date_range(user_id, range).await?;
        debug!("Summarizing {} credit card expenses for user {}", expenses.len(), user_id);
        Ok(CreditCardExpenseSummary::from_expenses(&expenses))
    }

    /// Split a purchase into one row per monthly installment, inserted
    /// together or not at all.
    pub async fn generate_installments(
        &self,
        user_id: Uuid,
        input: PurchaseInput,
    ) -> ServiceResult<Vec<CreditCardExpense>> {
        let purchase = validate(user_id, input)?;
        let count = purchase.installments_number as u32;
        if ((purchase.amount * 100.0).round() as i64) < count as i64 {
            return Err(ServiceError::validation(
                "installments_number",
                "amount is too small to split into that many installments",
            ));
        }

        let dates = installment_dates(purchase.date, count).ok_or_else(|| {
            ServiceError::validation("date", "installment schedule runs past the supported date range")
        })?;

        let rows: Vec<NewCreditCardExpense> = split_installments(purchase.amount, count)
            .into_iter()
            .zip(dates)
            .map(|(share, date)| NewCreditCardExpense {
                user_id,
                category_id: purchase.category_id,
                amount: share,
                description: purchase.description.clone(),
                date,
                card_id: purchase.card_id,
                installment_amount: share,
                installments_number: purchase.installments_number,
            })
            .collect();

        let created = self.expenses.insert_many(rows).await?;
        info!(
            "Generated {} installments on card {} for user {}",
            created.len(),
            purchase.card_id,
            user_id
        );
        Ok(created)
    }
}

fn check_installments(n: i32) -> ServiceResult<()> {
    if !(1..=MAX_INSTALLMENTS).contains(&n) {
        return Err(ServiceError::validation(
            "installments_number",
            format!("installments number must be between 1 and {MAX_INSTALLMENTS}"),
        ));
    }
    Ok(())
}

fn validate(user_id: Uuid, input: PurchaseInput) -> ServiceResult<NewCreditCardExpense> {
    require_positive_amount(input.amount)?;
    if input.card_id.is_nil() {
        return Err(ServiceError::validation("card_id", "card id is required"));
    }
    let installments_number = input.installments_number.unwrap_or(1);
    check_installments(installments_number)?;

    let installment_amount = match input.installment_amount {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            return Err(ServiceError::validation(
                "installment_amount",
                "installment amount must be zero or greater",
            ))
        }
        Some(amount) if amount > 0.0 => amount,
        _ => round_cents(input.amount / installments_number as f64),
    };

    Ok(NewCreditCardExpense {
        user_id,
        category_id: input.category_id,
        amount: input.amount,
        description: input.description,
        date: input.date,
        card_id: input.card_id,
        installment_amount,
        installments_number,
    })
}

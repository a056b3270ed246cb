use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::{
    NewRecurringExpense, NewRecurringOccurrence, RecurringExpense, RecurringExpensePatch,
    RecurringExpenseSummary, RecurringOccurrence,
};
use crate::database::repository::RecurringExpenseRepository;
use crate::filter::{DateRange, RecurringExpenseFilters};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::schedule::occurrence_dates;
use crate::services::{owned_by, require_positive_amount};

const WHAT: &str = "recurring expense";

/// How far past today `generate` may look
pub const MAX_GENERATION_YEARS: u32 = 5;

/// Occurrences a single `generate` call may materialize
pub const MAX_OCCURRENCES_PER_RUN: usize = 2000;

pub struct RecurringExpenseService {
    expenses: Arc<dyn RecurringExpenseRepository>,
}

impl RecurringExpenseService {
    pub fn new(expenses: Arc<dyn RecurringExpenseRepository>) -> Self {
        Self { expenses }
    }

    pub async fn create(&self, expense: NewRecurringExpense) -> ServiceResult<RecurringExpense> {
        require_positive_amount(expense.amount)?;
        check_window(expense.start_date, expense.end_date)?;
        Ok(self.expenses.insert(expense).await?)
    }

    pub async fn update(&self, patch: RecurringExpensePatch) -> ServiceResult<RecurringExpense> {
        let patch = patch.normalized();
        if let Some(amount) = patch.amount {
            require_positive_amount(amount)?;
        }
        if patch.start_date.is_some() || patch.end_date.is_some() {
            let current = self.get_by_id(patch.id, patch.user_id).await?;
            check_window(
                patch.start_date.unwrap_or(current.start_date),
                patch.end_date.or(current.end_date),
            )?;
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

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> ServiceResult<RecurringExpense> {
        owned_by(self.expenses.find_by_id(id).await?, user_id, WHAT)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filters: &RecurringExpenseFilters,
    ) -> ServiceResult<Vec<RecurringExpense>> {
        Ok(self.expenses.find_by_filter(user_id, filters).await?)
    }

    pub async fn summary(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> ServiceResult<RecurringExpenseSummary> {
        let expenses = self.expenses.find_by_date_range(user_id, range).await?;
        debug!("Summarizing {} recurring expenses for user {}", expenses.len(), user_id);
        Ok(RecurringExpenseSummary::from_expenses(&expenses))
    }

    /// Materialize every occurrence due up to `target` that has not been
    /// generated yet, across all of the user's active templates.
    pub async fn generate(
        &self,
        user_id: Uuid,
        target: NaiveDate,
    ) -> ServiceResult<Vec<RecurringOccurrence>> {
        check_horizon(target, Utc::now().date_naive())?;

        let templates = self.expenses.find_active(user_id, target).await?;
        let latest = self.expenses.latest_occurrences(user_id).await?;

        let mut pending: Vec<NewRecurringOccurrence> = Vec::new();
        for template in &templates {
            let remaining = MAX_OCCURRENCES_PER_RUN - pending.len();
            let dates: Vec<NaiveDate> = occurrence_dates(
                template.start_date,
                template.end_date,
                template.frequency,
                latest.get(&template.id).copied(),
                target,
            )
            .take(remaining + 1)
            .collect();

            if dates.len() > remaining {
                return Err(ServiceError::validation(
                    "target_date",
                    format!(
                        "more than {MAX_OCCURRENCES_PER_RUN} occurrences are due; \
                         generate up to an earlier target date first"
                    ),
                ));
            }
            pending.extend(
                dates
                    .into_iter()
                    .map(|date| NewRecurringOccurrence::from_template(template, date)),
            );
        }

        if pending.is_empty() {
            debug!("No recurring occurrences due for user {} up to {}", user_id, target);
            return Ok(Vec::new());
        }

        let created = self.expenses.insert_occurrences(pending).await?;
        info!(
            "Generated {} recurring occurrences for user {} up to {}",
            created.len(),
            user_id,
            target
        );
        Ok(created)
    }
}

fn check_window(start: NaiveDate, end: Option<NaiveDate>) -> ServiceResult<()> {
    match end {
        Some(end) if end < start => Err(ServiceError::validation(
            "end_date",
            "end date must not be before start date",
        )),
        _ => Ok(()),
    }
}

fn check_horizon(target: NaiveDate, today: NaiveDate) -> ServiceResult<()> {
    let horizon = today.checked_add_months(Months::new(12 * MAX_GENERATION_YEARS));
    match horizon {
        Some(horizon) if target <= horizon => Ok(()),
        _ => Err(ServiceError::validation(
            "target_date",
            format!("target date must be within {MAX_GENERATION_YEARS} years from today"),
        )),
    }
}

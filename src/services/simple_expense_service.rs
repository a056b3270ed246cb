use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::database::models::{NewSimpleExpense, SimpleExpense, SimpleExpensePatch, SimpleExpenseSummary};
use crate::database::repository::SimpleExpenseRepository;
use crate::filter::{DateRange, SimpleExpenseFilters};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::{owned_by, require_positive_amount};

const WHAT: &str = "simple expense";

pub struct SimpleExpenseService {
    expenses: Arc<dyn SimpleExpenseRepository>,
}

impl SimpleExpenseService {
    pub fn new(expenses: Arc<dyn SimpleExpenseRepository>) -> Self {
        Self { expenses }
    }

    pub async fn create(&self, expense: NewSimpleExpense) -> ServiceResult<SimpleExpense> {
        require_positive_amount(expense.amount)?;
        Ok(self.expenses.insert(expense).await?)
    }

    /// Merge-patch update scoped to the owner
    pub async fn update(&self, patch: SimpleExpensePatch) -> ServiceResult<SimpleExpense> {
        let patch = patch.normalized();
        if let Some(amount) = patch.amount {
            require_positive_amount(amount)?;
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

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> ServiceResult<SimpleExpense> {
        owned_by(self.expenses.find_by_id(id).await?, user_id, WHAT)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filters: &SimpleExpenseFilters,
    ) -> ServiceResult<Vec<SimpleExpense>> {
        Ok(self.expenses.find_by_filter(user_id, filters).await?)
    }

    pub async fn summary(&self, user_id: Uuid, range: DateRange) -> ServiceResult<SimpleExpenseSummary> {
        let expenses = self.expenses.find_by_date_range(user_id, range).await?;
        debug!("Summarizing {} simple expenses for user {}", expenses.len(), user_id);
        Ok(SimpleExpenseSummary::from_expenses(&expenses))
    }
}

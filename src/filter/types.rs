use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::Frequency;

/// LIMIT / OFFSET applied after filtering and ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Predicates shared by every expense kind, AND-ed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilters {
    pub category_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub page: Page,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleExpenseFilters {
    pub base: ExpenseFilters,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringExpenseFilters {
    pub base: ExpenseFilters,
    pub card_id: Option<Uuid>,
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditCardExpenseFilters {
    pub base: ExpenseFilters,
    pub card_id: Option<Uuid>,
    pub installments_number: Option<i32>,
}

/// Inclusive date window for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

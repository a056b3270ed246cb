use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::{CreditCardExpense, RecurringExpense, SimpleExpense};

/// Mean of `total` over `count` rows; 0 for an empty set
pub fn average(total: f64, count: i64) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimpleExpenseSummary {
    pub total_amount: f64,
    pub total_count: i64,
    pub average_amount: f64,
    pub by_category: BTreeMap<i32, f64>,
}

impl SimpleExpenseSummary {
    pub fn from_expenses(expenses: &[SimpleExpense]) -> Self {
        let mut summary = Self::default();
        for e in expenses {
            summary.total_amount += e.amount;
            summary.total_count += 1;
            *summary.by_category.entry(e.category_id).or_default() += e.amount;
        }
        summary.average_amount = average(summary.total_amount, summary.total_count);
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecurringExpenseSummary {
    pub total_amount: f64,
    pub total_count: i64,
    pub average_amount: f64,
    pub by_category: BTreeMap<i32, f64>,
    pub by_frequency: BTreeMap<String, f64>,
}

impl RecurringExpenseSummary {
    pub fn from_expenses(expenses: &[RecurringExpense]) -> Self {
        let mut summary = Self::default();
        for e in expenses {
            summary.total_amount += e.amount;
            summary.total_count += 1;
            *summary.by_category.entry(e.category_id).or_default() += e.amount;
            *summary
                .by_frequency
                .entry(e.frequency.to_string())
                .or_default() += e.amount;
        }
        summary.average_amount = average(summary.total_amount, summary.total_count);
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditCardExpenseSummary {
    pub total_amount: f64,
    pub total_count: i64,
    pub average_amount: f64,
    pub by_category: BTreeMap<i32, f64>,
    pub by_card: BTreeMap<Uuid, f64>,
    pub by_installments_number: BTreeMap<i32, f64>,
}

impl CreditCardExpenseSummary {
    pub fn from_expenses(expenses: &[CreditCardExpense]) -> Self {
        let mut summary = Self::default();
        for e in expenses {
            summary.total_amount += e.amount;
            summary.total_count += 1;
            *summary.by_category.entry(e.category_id).or_default() += e.amount;
            *summary.by_card.entry(e.card_id).or_default() += e.amount;
            *summary
                .by_installments_number
                .entry(e.installments_number)
                .or_default() += e.amount;
        }
        summary.average_amount = average(summary.total_amount, summary.total_count);
        summary
    }
}

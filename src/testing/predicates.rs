//! Row-level equivalents of the SQL the Postgres repositories build, so the
//! in-memory store filters, pages and patches the same way.

use chrono::NaiveDate;

use crate::database::models::{
    CreditCardExpense, CreditCardExpensePatch, RecurringExpense, RecurringExpensePatch,
    SimpleExpense, SimpleExpensePatch,
};
use crate::filter::{
    CreditCardExpenseFilters, ExpenseFilters, Page, RecurringExpenseFilters, SimpleExpenseFilters,
};

pub trait Paging {
    /// Slice an already ordered result set the way `LIMIT .. OFFSET ..` would
    fn apply<T>(&self, rows: Vec<T>) -> Vec<T>;
}

impl Paging for Page {
    fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0).max(0) as usize;
        let rows = rows.into_iter().skip(offset);
        match self.limit {
            Some(limit) => rows.take(limit.max(0) as usize).collect(),
            None => rows.collect(),
        }
    }
}

pub trait RowFilter {
    type Row;
    fn matches(&self, row: &Self::Row) -> bool;
}

fn base_matches(f: &ExpenseFilters, category_id: i32, amount: f64, date: NaiveDate) -> bool {
    f.category_id.map_or(true, |c| c == category_id)
        && f.start_date.map_or(true, |d| date >= d)
        && f.end_date.map_or(true, |d| date <= d)
        && f.min_amount.map_or(true, |m| amount >= m)
        && f.max_amount.map_or(true, |m| amount <= m)
}

impl RowFilter for SimpleExpenseFilters {
    type Row = SimpleExpense;

    fn matches(&self, e: &SimpleExpense) -> bool {
        base_matches(&self.base, e.category_id, e.amount, e.date)
    }
}

impl RowFilter for RecurringExpenseFilters {
    type Row = RecurringExpense;

    fn matches(&self, e: &RecurringExpense) -> bool {
        base_matches(&self.base, e.category_id, e.amount, e.date)
            && self.card_id.map_or(true, |c| e.card_id == Some(c))
            && self.frequency.map_or(true, |f| e.frequency == f)
    }
}

impl RowFilter for CreditCardExpenseFilters {
    type Row = CreditCardExpense;

    fn matches(&self, e: &CreditCardExpense) -> bool {
        base_matches(&self.base, e.category_id, e.amount, e.date)
            && self.card_id.map_or(true, |c| e.card_id == c)
            && self
                .installments_number
                .map_or(true, |n| e.installments_number == n)
    }
}

/// Merge-patch onto a stored row: `Some` overwrites, `None` keeps
pub trait ApplyPatch {
    type Row;
    fn apply_to(&self, row: &mut Self::Row);
}

fn set<V: Clone>(slot: &mut V, value: &Option<V>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

impl ApplyPatch for SimpleExpensePatch {
    type Row = SimpleExpense;

    fn apply_to(&self, e: &mut SimpleExpense) {
        set(&mut e.category_id, &self.category_id);
        set(&mut e.amount, &self.amount);
        set(&mut e.date, &self.date);
        if self.description.is_some() {
            e.description = self.description.clone();
        }
    }
}

impl ApplyPatch for RecurringExpensePatch {
    type Row = RecurringExpense;

    fn apply_to(&self, e: &mut RecurringExpense) {
        set(&mut e.category_id, &self.category_id);
        set(&mut e.amount, &self.amount);
        set(&mut e.date, &self.date);
        set(&mut e.start_date, &self.start_date);
        set(&mut e.frequency, &self.frequency);
        if self.description.is_some() {
            e.description = self.description.clone();
        }
        if self.card_id.is_some() {
            e.card_id = self.card_id;
        }
        if self.end_date.is_some() {
            e.end_date = self.end_date;
        }
    }
}

impl ApplyPatch for CreditCardExpensePatch {
    type Row = CreditCardExpense;

    fn apply_to(&self, e: &mut CreditCardExpense) {
        set(&mut e.category_id, &self.category_id);
        set(&mut e.amount, &self.amount);
        set(&mut e.date, &self.date);
        set(&mut e.card_id, &self.card_id);
        set(&mut e.installment_amount, &self.installment_amount);
        set(&mut e.installments_number, &self.installments_number);
        if self.description.is_some() {
            e.description = self.description.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slices_after_ordering() {
        let rows = vec![1, 2, 3, 4, 5];
        let page = Page { limit: Some(2), offset: Some(2) };
        assert_eq!(page.apply(rows.clone()), vec![3, 4]);
        assert_eq!(Page::default().apply(rows.clone()), rows);
        assert_eq!(Page { limit: None, offset: Some(4) }.apply(rows), vec![5]);
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let filters = ExpenseFilters {
            min_amount: Some(50.0),
            max_amount: Some(100.0),
            ..Default::default()
        };
        let d: NaiveDate = "2024-01-01".parse().unwrap();
        assert!(base_matches(&filters, 1, 50.0, d));
        assert!(base_matches(&filters, 1, 100.0, d));
        assert!(!base_matches(&filters, 1, 49.99, d));
        assert!(!base_matches(&filters, 1, 100.01, d));
    }
}

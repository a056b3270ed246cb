use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use crate::filter::{ExpenseFilters, Page};

/// Append the shared expense predicates. Every value is bound, never
/// interpolated. The builder must already hold a `WHERE` clause.
pub fn push_expense_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ExpenseFilters) {
    if let Some(category_id) = filters.category_id {
        qb.push(" AND category_id = ").push_bind(category_id);
    }
    push_date_range(qb, filters.start_date, filters.end_date);
    if let Some(min) = filters.min_amount {
        qb.push(" AND amount >= ").push_bind(min);
    }
    if let Some(max) = filters.max_amount {
        qb.push(" AND amount <= ").push_bind(max);
    }
}

/// Inclusive `date` window
pub fn push_date_range(
    qb: &mut QueryBuilder<'_, Postgres>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        qb.push(" AND date >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND date <= ").push_bind(end);
    }
}

/// Newest first, creation time as the tie-break, then LIMIT and OFFSET
pub fn push_order_and_page(qb: &mut QueryBuilder<'_, Postgres>, page: &Page) {
    qb.push(" ORDER BY date DESC, created_at DESC");
    if let Some(limit) = page.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = page.offset {
        qb.push(" OFFSET ").push_bind(offset);
    }
}

/// Comma-joined `SET` list for merge-patch updates. `updated_at` is always
/// refreshed, so the list is never empty.
pub struct PatchBuilder<'q, 'args> {
    qb: &'q mut QueryBuilder<'args, Postgres>,
}

impl<'q, 'args> PatchBuilder<'q, 'args> {
    pub fn new(qb: &'q mut QueryBuilder<'args, Postgres>, table: &str) -> Self {
        qb.push("UPDATE ")
            .push(table)
            .push(" SET updated_at = NOW()");
        Self { qb }
    }

    pub fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.qb.push(", ").push(column).push(" = ").push_bind(value);
        }
        self
    }

    pub fn finish(self) -> &'q mut QueryBuilder<'args, Postgres> {
        self.qb
    }
}

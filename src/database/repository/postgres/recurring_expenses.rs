use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{
    NewRecurringExpense, NewRecurringOccurrence, RecurringExpense, RecurringExpensePatch,
    RecurringOccurrence,
};
use crate::database::query_builder::{push_date_range, push_expense_filters, push_order_and_page, PatchBuilder};
use crate::database::repository::RecurringExpenseRepository;
use crate::database::{Database, DatabaseError};
use crate::filter::{DateRange, Page, RecurringExpenseFilters};

const COLUMNS: &str = "id, user_id, category_id, amount, description, date, card_id, start_date, \
                       end_date, frequency, created_at, updated_at";

const OCCURRENCE_COLUMNS: &str =
    "id, recurring_expense_id, user_id, category_id, amount, description, date, card_id, created_at";

pub struct PgRecurringExpenseRepository {
    db: Database,
}

impl PgRecurringExpenseRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecurringExpenseRepository for PgRecurringExpenseRepository {
    async fn insert(&self, expense: NewRecurringExpense) -> Result<RecurringExpense, DatabaseError> {
        let sql = format!(
            "INSERT INTO recurring_expense \
             (user_id, category_id, amount, description, date, card_id, start_date, end_date, frequency) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
        );
        self.db
            .timed(
                "recurring_expense.insert",
                sqlx::query_as::<_, RecurringExpense>(&sql)
                    .bind(expense.user_id)
                    .bind(expense.category_id)
                    .bind(expense.amount)
                    .bind(&expense.description)
                    .bind(expense.date)
                    .bind(expense.card_id)
                    .bind(expense.start_date)
                    .bind(expense.end_date)
                    .bind(expense.frequency.as_str())
                    .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn update(
        &self,
        patch: RecurringExpensePatch,
    ) -> Result<Option<RecurringExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("");
        let mut set = PatchBuilder::new(&mut qb, "recurring_expense");
        set.set("category_id", patch.category_id)
            .set("amount", patch.amount)
            .set("description", patch.description)
            .set("date", patch.date)
            .set("card_id", patch.card_id)
            .set("start_date", patch.start_date)
            .set("end_date", patch.end_date)
            .set("frequency", patch.frequency.map(|f| f.as_str()));
        set.finish()
            .push(" WHERE id = ")
            .push_bind(patch.id)
            .push(" AND user_id = ")
            .push_bind(patch.user_id)
            .push(" RETURNING ")
            .push(COLUMNS);

        self.db
            .timed(
                "recurring_expense.update",
                qb.build_query_as::<RecurringExpense>()
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "recurring_expense.delete",
                sqlx::query("DELETE FROM recurring_expense WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RecurringExpense>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM recurring_expense WHERE id = $1");
        self.db
            .timed(
                "recurring_expense.find_by_id",
                sqlx::query_as::<_, RecurringExpense>(&sql)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &RecurringExpenseFilters,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM recurring_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_expense_filters(&mut qb, &filters.base);
        if let Some(card_id) = filters.card_id {
            qb.push(" AND card_id = ").push_bind(card_id);
        }
        if let Some(frequency) = filters.frequency {
            qb.push(" AND frequency = ").push_bind(frequency.as_str());
        }
        push_order_and_page(&mut qb, &filters.base.page);

        self.db
            .timed(
                "recurring_expense.find_by_filter",
                qb.build_query_as::<RecurringExpense>().fetch_all(self.db.pool()),
            )
            .await
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM recurring_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_date_range(&mut qb, Some(range.start), Some(range.end));
        push_order_and_page(&mut qb, &Page::default());

        self.db
            .timed(
                "recurring_expense.find_by_date_range",
                qb.build_query_as::<RecurringExpense>().fetch_all(self.db.pool()),
            )
            .await
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        target: NaiveDate,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM recurring_expense \
             WHERE user_id = $1 AND start_date <= $2 \
             ORDER BY start_date, created_at"
        );
        self.db
            .timed(
                "recurring_expense.find_active",
                sqlx::query_as::<_, RecurringExpense>(&sql)
                    .bind(user_id)
                    .bind(target)
                    .fetch_all(self.db.pool()),
            )
            .await
    }

    async fn latest_occurrences(
        &self,
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, NaiveDate>, DatabaseError> {
        let rows: Vec<(Uuid, NaiveDate)> = self
            .db
            .timed(
                "recurring_expense.latest_occurrences",
                sqlx::query_as::<_, (Uuid, NaiveDate)>(
                    "SELECT recurring_expense_id, MAX(date) FROM recurring_expense_occurrence \
                     WHERE user_id = $1 GROUP BY recurring_expense_id",
                )
                .bind(user_id)
                .fetch_all(self.db.pool()),
            )
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn insert_occurrences(
        &self,
        occurrences: Vec<NewRecurringOccurrence>,
    ) -> Result<Vec<RecurringOccurrence>, DatabaseError> {
        if occurrences.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "INSERT INTO recurring_expense_occurrence \
             (recurring_expense_id, user_id, category_id, amount, description, date, card_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (recurring_expense_id, date) DO NOTHING \
             RETURNING {OCCURRENCE_COLUMNS}"
        );

        let pool = self.db.pool();
        self.db
            .timed("recurring_expense.insert_occurrences", async {
                let mut tx = pool.begin().await?;
                let mut inserted = Vec::with_capacity(occurrences.len());

                for (index, occurrence) in occurrences.iter().enumerate() {
                    let row = sqlx::query_as::<_, RecurringOccurrence>(&sql)
                        .bind(occurrence.recurring_expense_id)
                        .bind(occurrence.user_id)
                        .bind(occurrence.category_id)
                        .bind(occurrence.amount)
                        .bind(&occurrence.description)
                        .bind(occurrence.date)
                        .bind(occurrence.card_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|source| DatabaseError::BatchItem { index, source })?;

                    match row {
                        Some(row) => inserted.push(row),
                        None => debug!(
                            "occurrence {} of {} already exists",
                            occurrence.date, occurrence.recurring_expense_id
                        ),
                    }
                }

                tx.commit().await?;
                Ok::<_, DatabaseError>(inserted)
            })
            .await
    }
}

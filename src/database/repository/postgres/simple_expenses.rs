use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{NewSimpleExpense, SimpleExpense, SimpleExpensePatch};
use crate::database::query_builder::{push_date_range, push_expense_filters, push_order_and_page, PatchBuilder};
use crate::database::repository::SimpleExpenseRepository;
use crate::database::{Database, DatabaseError};
use crate::filter::{DateRange, Page, SimpleExpenseFilters};

const COLUMNS: &str = "id, user_id, category_id, amount, description, date, created_at, updated_at";

pub struct PgSimpleExpenseRepository {
    db: Database,
}

impl PgSimpleExpenseRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SimpleExpenseRepository for PgSimpleExpenseRepository {
    async fn insert(&self, expense: NewSimpleExpense) -> Result<SimpleExpense, DatabaseError> {
        let sql = format!(
            "INSERT INTO simple_expense (user_id, category_id, amount, description, date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        self.db
            .timed(
                "simple_expense.insert",
                sqlx::query_as::<_, SimpleExpense>(&sql)
                    .bind(expense.user_id)
                    .bind(expense.category_id)
                    .bind(expense.amount)
                    .bind(&expense.description)
                    .bind(expense.date)
                    .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn update(&self, patch: SimpleExpensePatch) -> Result<Option<SimpleExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("");
        let mut set = PatchBuilder::new(&mut qb, "simple_expense");
        set.set("category_id", patch.category_id)
            .set("amount", patch.amount)
            .set("description", patch.description)
            .set("date", patch.date);
        set.finish()
            .push(" WHERE id = ")
            .push_bind(patch.id)
            .push(" AND user_id = ")
            .push_bind(patch.user_id)
            .push(" RETURNING ")
            .push(COLUMNS);

        self.db
            .timed(
                "simple_expense.update",
                qb.build_query_as::<SimpleExpense>().fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "simple_expense.delete",
                sqlx::query("DELETE FROM simple_expense WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SimpleExpense>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM simple_expense WHERE id = $1");
        self.db
            .timed(
                "simple_expense.find_by_id",
                sqlx::query_as::<_, SimpleExpense>(&sql)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &SimpleExpenseFilters,
    ) -> Result<Vec<SimpleExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM simple_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_expense_filters(&mut qb, &filters.base);
        push_order_and_page(&mut qb, &filters.base.page);

        self.db
            .timed(
                "simple_expense.find_by_filter",
                qb.build_query_as::<SimpleExpense>().fetch_all(self.db.pool()),
            )
            .await
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<SimpleExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM simple_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_date_range(&mut qb, Some(range.start), Some(range.end));
        push_order_and_page(&mut qb, &Page::default());

        self.db
            .timed(
                "simple_expense.find_by_date_range",
                qb.build_query_as::<SimpleExpense>().fetch_all(self.db.pool()),
            )
            .await
    }
}

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{CreditCardExpense, CreditCardExpensePatch, NewCreditCardExpense};
use crate::database::query_builder::{push_date_range, push_expense_filters, push_order_and_page, PatchBuilder};
use crate::database::repository::CreditCardExpenseRepository;
use crate::database::{Database, DatabaseError};
use crate::filter::{CreditCardExpenseFilters, DateRange, Page};

const COLUMNS: &str = "id, user_id, category_id, amount, description, date, card_id, \
                       installment_amount, installments_number, created_at, updated_at";

const INSERT: &str = "INSERT INTO credit_card_expense \
                      (user_id, category_id, amount, description, date, card_id, installment_amount, installments_number) \
                      VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING ";

pub struct PgCreditCardExpenseRepository {
    db: Database,
}

impl PgCreditCardExpenseRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn insert_query<'q>(
    sql: &'q str,
    expense: &'q NewCreditCardExpense,
) -> sqlx::query::QueryAs<'q, Postgres, CreditCardExpense, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, CreditCardExpense>(sql)
        .bind(expense.user_id)
        .bind(expense.category_id)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.date)
        .bind(expense.card_id)
        .bind(expense.installment_amount)
        .bind(expense.installments_number)
}

#[async_trait]
impl CreditCardExpenseRepository for PgCreditCardExpenseRepository {
    async fn insert(&self, expense: NewCreditCardExpense) -> Result<CreditCardExpense, DatabaseError> {
        let sql = format!("{INSERT}{COLUMNS}");
        self.db
            .timed(
                "credit_card_expense.insert",
                insert_query(&sql, &expense).fetch_one(self.db.pool()),
            )
            .await
    }

    async fn update(
        &self,
        patch: CreditCardExpensePatch,
    ) -> Result<Option<CreditCardExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("");
        let mut set = PatchBuilder::new(&mut qb, "credit_card_expense");
        set.set("category_id", patch.category_id)
            .set("amount", patch.amount)
            .set("description", patch.description)
            .set("date", patch.date)
            .set("card_id", patch.card_id)
            .set("installment_amount", patch.installment_amount)
            .set("installments_number", patch.installments_number);
        set.finish()
            .push(" WHERE id = ")
            .push_bind(patch.id)
            .push(" AND user_id = ")
            .push_bind(patch.user_id)
            .push(" RETURNING ")
            .push(COLUMNS);

        self.db
            .timed(
                "credit_card_expense.update",
                qb.build_query_as::<CreditCardExpense>()
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "credit_card_expense.delete",
                sqlx::query("DELETE FROM credit_card_expense WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCardExpense>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM credit_card_expense WHERE id = $1");
        self.db
            .timed(
                "credit_card_expense.find_by_id",
                sqlx::query_as::<_, CreditCardExpense>(&sql)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &CreditCardExpenseFilters,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM credit_card_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_expense_filters(&mut qb, &filters.base);
        if let Some(card_id) = filters.card_id {
            qb.push(" AND card_id = ").push_bind(card_id);
        }
        if let Some(n) = filters.installments_number {
            qb.push(" AND installments_number = ").push_bind(n);
        }
        push_order_and_page(&mut qb, &filters.base.page);

        self.db
            .timed(
                "credit_card_expense.find_by_filter",
                qb.build_query_as::<CreditCardExpense>().fetch_all(self.db.pool()),
            )
            .await
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM credit_card_expense WHERE user_id = "
        ));
        qb.push_bind(user_id);
        push_date_range(&mut qb, Some(range.start), Some(range.end));
        push_order_and_page(&mut qb, &Page::default());

        self.db
            .timed(
                "credit_card_expense.find_by_date_range",
                qb.build_query_as::<CreditCardExpense>().fetch_all(self.db.pool()),
            )
            .await
    }

    async fn insert_many(
        &self,
        expenses: Vec<NewCreditCardExpense>,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        if expenses.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("{INSERT}{COLUMNS}");
        let pool = self.db.pool();
        self.db
            .timed("credit_card_expense.insert_many", async {
                let mut tx = pool.begin().await?;
                let mut inserted = Vec::with_capacity(expenses.len());

                for (index, expense) in expenses.iter().enumerate() {
                    let row = insert_query(&sql, expense)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|source| DatabaseError::BatchItem { index, source })?;
                    inserted.push(row);
                }

                tx.commit().await?;
                Ok::<_, DatabaseError>(inserted)
            })
            .await
    }
}

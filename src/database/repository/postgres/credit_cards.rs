use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{CreditCard, NewCreditCard};
use crate::database::repository::CreditCardRepository;
use crate::database::{Database, DatabaseError};

const COLUMNS: &str =
    "id, user_id, card_name, total_limit, current_limit, due_date, created_at, updated_at";

pub struct PgCreditCardRepository {
    db: Database,
}

impl PgCreditCardRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreditCardRepository for PgCreditCardRepository {
    async fn insert(&self, card: NewCreditCard) -> Result<CreditCard, DatabaseError> {
        let sql = format!(
            "INSERT INTO credit_cards (user_id, card_name, total_limit, current_limit, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        self.db
            .timed(
                "credit_cards.insert",
                sqlx::query_as::<_, CreditCard>(&sql)
                    .bind(card.user_id)
                    .bind(&card.card_name)
                    .bind(card.total_limit)
                    .bind(card.current_limit)
                    .bind(card.due_date)
                    .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<CreditCard>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM credit_cards WHERE user_id = $1 ORDER BY created_at");
        self.db
            .timed(
                "credit_cards.list_by_user",
                sqlx::query_as::<_, CreditCard>(&sql)
                    .bind(user_id)
                    .fetch_all(self.db.pool()),
            )
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCard>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM credit_cards WHERE id = $1");
        self.db
            .timed(
                "credit_cards.find_by_id",
                sqlx::query_as::<_, CreditCard>(&sql)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "credit_cards.delete",
                sqlx::query("DELETE FROM credit_cards WHERE id = $1")
                    .bind(id)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }
}

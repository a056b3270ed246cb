use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{NewRefreshToken, RefreshToken};
use crate::database::repository::RefreshTokenRepository;
use crate::database::{Database, DatabaseError};

const COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at";

pub struct PgRefreshTokenRepository {
    db: Database,
}

impl PgRefreshTokenRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshToken, DatabaseError> {
        let sql = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        self.db
            .timed(
                "refresh_tokens.insert",
                sqlx::query_as::<_, RefreshToken>(&sql)
                    .bind(token.user_id)
                    .bind(&token.token_hash)
                    .bind(token.expires_at)
                    .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token_hash = $1");
        self.db
            .timed(
                "refresh_tokens.find_by_hash",
                sqlx::query_as::<_, RefreshToken>(&sql)
                    .bind(token_hash)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "refresh_tokens.delete_by_hash",
                sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
                    .bind(token_hash)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "refresh_tokens.delete_expired",
                sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND expires_at <= $2")
                    .bind(user_id)
                    .bind(now)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }
}

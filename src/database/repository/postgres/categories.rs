use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Category, NewCategory};
use crate::database::repository::CategoryRepository;
use crate::database::{Database, DatabaseError};

pub struct PgCategoryRepository {
    db: Database,
}

impl PgCategoryRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError> {
        self.db
            .timed(
                "categories.insert",
                sqlx::query_as::<_, Category>(
                    "INSERT INTO categories (name, user_id) VALUES ($1, $2) RETURNING id, name, user_id",
                )
                .bind(&category.name)
                .bind(category.user_id)
                .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        self.db
            .timed(
                "categories.list_for_user",
                sqlx::query_as::<_, Category>(
                    "SELECT id, name, user_id FROM categories \
                     WHERE user_id = $1 OR user_id IS NULL ORDER BY id",
                )
                .bind(user_id)
                .fetch_all(self.db.pool()),
            )
            .await
    }

    async fn delete_owned(&self, id: i32, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = self
            .db
            .timed(
                "categories.delete_owned",
                sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user_id)
                    .execute(self.db.pool()),
            )
            .await?;
        Ok(result.rows_affected())
    }
}

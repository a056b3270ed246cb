use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{NewUser, User};
use crate::database::repository::UserRepository;
use crate::database::{Database, DatabaseError};

const COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, profile_picture, \
                       income, expenditure_limit, created_at, updated_at";

pub struct PgUserRepository {
    db: Database,
}

impl PgUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, first_name, last_name, email, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        self.db
            .timed(
                "users.insert",
                sqlx::query_as::<_, User>(&sql)
                    .bind(&user.username)
                    .bind(&user.first_name)
                    .bind(&user.last_name)
                    .bind(&user.email)
                    .bind(&user.password_hash)
                    .fetch_one(self.db.pool()),
            )
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        self.db
            .timed(
                "users.find_by_email",
                sqlx::query_as::<_, User>(&sql)
                    .bind(email)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = self
            .db
            .timed(
                "users.exists",
                sqlx::query_as::<_, (bool,)>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                    .bind(id)
                    .fetch_one(self.db.pool()),
            )
            .await?;
        Ok(exists)
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Spending category. A `None` owner marks a global category shared by everyone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub user_id: Uuid,
}

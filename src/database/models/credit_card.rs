use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_name: String,
    pub total_limit: f64,
    pub current_limit: f64,
    /// Day of the month the bill is due
    pub due_date: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for CreditCard {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewCreditCard {
    pub user_id: Uuid,
    pub card_name: String,
    pub total_limit: f64,
    pub current_limit: f64,
    pub due_date: i32,
}

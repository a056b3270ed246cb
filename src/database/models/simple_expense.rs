use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{non_zero_f64, non_zero_i32, Owned};

/// One-off expense
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SimpleExpense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for SimpleExpense {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewSimpleExpense {
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Merge patch: `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct SimpleExpensePatch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SimpleExpensePatch {
    pub fn normalized(mut self) -> Self {
        self.category_id = non_zero_i32(self.category_id);
        self.amount = non_zero_f64(self.amount);
        self
    }
}

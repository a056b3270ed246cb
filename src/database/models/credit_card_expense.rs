use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{non_zero_f64, non_zero_i32, Owned};

/// Card purchase, or one installment row of a split purchase
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditCardExpense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Uuid,
    pub installment_amount: f64,
    pub installments_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for CreditCardExpense {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewCreditCardExpense {
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Uuid,
    pub installment_amount: f64,
    pub installments_number: i32,
}

#[derive(Debug, Clone, Default)]
pub struct CreditCardExpensePatch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
    pub installment_amount: Option<f64>,
    pub installments_number: Option<i32>,
}

impl CreditCardExpensePatch {
    pub fn normalized(mut self) -> Self {
        self.category_id = non_zero_i32(self.category_id);
        self.amount = non_zero_f64(self.amount);
        self.card_id = self.card_id.filter(|id| !id.is_nil());
        self.installment_amount = non_zero_f64(self.installment_amount);
        self.installments_number = non_zero_i32(self.installments_number);
        self
    }
}

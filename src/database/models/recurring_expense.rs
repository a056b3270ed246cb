use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use super::{non_zero_f64, non_zero_i32, Owned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Error)]
#[error("unknown frequency '{0}', expected one of daily, weekly, monthly, yearly")]
pub struct UnknownFrequency(pub String);

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(UnknownFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = UnknownFrequency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Template from which dated occurrences are generated
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurringExpense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    /// Anchor date
    pub date: NaiveDate,
    pub card_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for RecurringExpense {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewRecurringExpense {
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Default)]
pub struct RecurringExpensePatch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
}

impl RecurringExpensePatch {
    pub fn normalized(mut self) -> Self {
        self.category_id = non_zero_i32(self.category_id);
        self.amount = non_zero_f64(self.amount);
        self.card_id = self.card_id.filter(|id| !id.is_nil());
        self
    }
}

/// One materialized occurrence of a recurring template
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurringOccurrence {
    pub id: Uuid,
    pub recurring_expense_id: Uuid,
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRecurringOccurrence {
    pub recurring_expense_id: Uuid,
    pub user_id: Uuid,
    pub category_id: i32,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub card_id: Option<Uuid>,
}

impl NewRecurringOccurrence {
    pub fn from_template(template: &RecurringExpense, date: NaiveDate) -> Self {
        Self {
            recurring_expense_id: template.id,
            user_id: template.user_id,
            category_id: template.category_id,
            amount: template.amount,
            description: template.description.clone(),
            date,
            card_id: template.card_id,
        }
    }
}

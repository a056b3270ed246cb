//! Persistence contracts, one narrow trait per entity kind.
//!
//! Services only see these traits; `postgres` holds the sqlx-backed
//! implementations used by the server.

pub mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    Category, CreditCard, CreditCardExpense, CreditCardExpensePatch, NewCategory, NewCreditCard,
    NewCreditCardExpense, NewRecurringExpense, NewRecurringOccurrence, NewRefreshToken,
    NewSimpleExpense, NewUser, RecurringExpense, RecurringExpensePatch, RecurringOccurrence,
    RefreshToken, SimpleExpense, SimpleExpensePatch, User,
};
use crate::database::{Database, DatabaseError, HealthCheck};
use crate::filter::{CreditCardExpenseFilters, DateRange, RecurringExpenseFilters, SimpleExpenseFilters};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshToken, DatabaseError>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DatabaseError>;
    /// Returns the number of rows removed
    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, DatabaseError>;
    /// Drops the user's tokens that expired at or before `now`
    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError>;
    /// Categories owned by the user plus the global ones
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Category>, DatabaseError>;
    /// Deletes only a category owned by `user_id`
    async fn delete_owned(&self, id: i32, user_id: Uuid) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait CreditCardRepository: Send + Sync {
    async fn insert(&self, card: NewCreditCard) -> Result<CreditCard, DatabaseError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<CreditCard>, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCard>, DatabaseError>;
    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait SimpleExpenseRepository: Send + Sync {
    async fn insert(&self, expense: NewSimpleExpense) -> Result<SimpleExpense, DatabaseError>;
    /// `None` when no row matches both id and owner
    async fn update(&self, patch: SimpleExpensePatch) -> Result<Option<SimpleExpense>, DatabaseError>;
    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SimpleExpense>, DatabaseError>;
    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &SimpleExpenseFilters,
    ) -> Result<Vec<SimpleExpense>, DatabaseError>;
    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<SimpleExpense>, DatabaseError>;
}

#[async_trait]
pub trait RecurringExpenseRepository: Send + Sync {
    async fn insert(&self, expense: NewRecurringExpense) -> Result<RecurringExpense, DatabaseError>;
    async fn update(
        &self,
        patch: RecurringExpensePatch,
    ) -> Result<Option<RecurringExpense>, DatabaseError>;
    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RecurringExpense>, DatabaseError>;
    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &RecurringExpenseFilters,
    ) -> Result<Vec<RecurringExpense>, DatabaseError>;
    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<RecurringExpense>, DatabaseError>;
    /// Templates whose start date is on or before `target`
    async fn find_active(
        &self,
        user_id: Uuid,
        target: NaiveDate,
    ) -> Result<Vec<RecurringExpense>, DatabaseError>;
    /// Latest materialized occurrence date per template
    async fn latest_occurrences(
        &self,
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, NaiveDate>, DatabaseError>;
    /// All-or-nothing bulk insert. Occurrences that already exist for the same
    /// template and date are skipped; only new rows are returned.
    async fn insert_occurrences(
        &self,
        occurrences: Vec<NewRecurringOccurrence>,
    ) -> Result<Vec<RecurringOccurrence>, DatabaseError>;
}

#[async_trait]
pub trait CreditCardExpenseRepository: Send + Sync {
    async fn insert(&self, expense: NewCreditCardExpense) -> Result<CreditCardExpense, DatabaseError>;
    async fn update(
        &self,
        patch: CreditCardExpensePatch,
    ) -> Result<Option<CreditCardExpense>, DatabaseError>;
    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCardExpense>, DatabaseError>;
    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &CreditCardExpenseFilters,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError>;
    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError>;
    /// All-or-nothing bulk insert
    async fn insert_many(
        &self,
        expenses: Vec<NewCreditCardExpense>,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError>;
}

/// Every repository the services need, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub credit_cards: Arc<dyn CreditCardRepository>,
    pub simple_expenses: Arc<dyn SimpleExpenseRepository>,
    pub recurring_expenses: Arc<dyn RecurringExpenseRepository>,
    pub credit_card_expenses: Arc<dyn CreditCardExpenseRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        use postgres::*;

        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenRepository::new(db.clone())),
            categories: Arc::new(PgCategoryRepository::new(db.clone())),
            credit_cards: Arc::new(PgCreditCardRepository::new(db.clone())),
            simple_expenses: Arc::new(PgSimpleExpenseRepository::new(db.clone())),
            recurring_expenses: Arc::new(PgRecurringExpenseRepository::new(db.clone())),
            credit_card_expenses: Arc::new(PgCreditCardExpenseRepository::new(db.clone())),
            health: Arc::new(db.clone()),
        }
    }
}

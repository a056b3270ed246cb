//! In-memory repositories and a router harness for unit tests.

mod predicates;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::models::*;
use crate::database::repository::*;
use crate::database::{DatabaseError, HealthCheck};
use crate::filter::{CreditCardExpenseFilters, DateRange, RecurringExpenseFilters, SimpleExpenseFilters};

use predicates::{ApplyPatch, Paging, RowFilter};

pub fn test_config() -> AppConfig {
    AppConfig::from_source(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Every repository trait over plain vectors
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    refresh_tokens: Mutex<Vec<RefreshToken>>,
    categories: Mutex<Vec<Category>>,
    credit_cards: Mutex<Vec<CreditCard>>,
    simple_expenses: Mutex<Vec<SimpleExpense>>,
    recurring_expenses: Mutex<Vec<RecurringExpense>>,
    occurrences: Mutex<Vec<RecurringOccurrence>>,
    credit_card_expenses: Mutex<Vec<CreditCardExpense>>,
    clock: Mutex<Option<DateTime<Utc>>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            refresh_tokens: self.clone(),
            categories: self.clone(),
            credit_cards: self.clone(),
            simple_expenses: self.clone(),
            recurring_expenses: self.clone(),
            credit_card_expenses: self.clone(),
            health: self.clone(),
        }
    }

    /// Make the health check fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a bare user row and return its id
    pub async fn add_user(&self, email: &str) -> Uuid {
        UserRepository::insert(
            self,
            NewUser {
                username: email.split('@').next().unwrap_or("user").to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password_hash: "not-a-hash".to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn add_global_category(&self, name: &str) -> Category {
        let mut categories = self.categories.lock().unwrap();
        let category = Category {
            id: categories.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            name: name.to_string(),
            user_id: None,
        };
        categories.push(category.clone());
        category
    }

    /// Strictly increasing timestamps, so `updated_at` always advances
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.clock.lock().unwrap();
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (NaiveDate, DateTime<Utc>)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Timeout("health.ping"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let now = self.now();
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            profile_picture: None,
            income: 0.0,
            expenditure_limit: 0.0,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.id == id))
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshToken, DatabaseError> {
        let now = self.now();
        let mut tokens = self.refresh_tokens.lock().unwrap();
        if tokens.iter().any(|t| t.token_hash == token.token_hash) {
            return Err(DatabaseError::UniqueViolation("refresh_tokens_token_hash_key".to_string()));
        }
        let token = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            created_at: now,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DatabaseError> {
        Ok(self
            .refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<u64, DatabaseError> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.token_hash != token_hash);
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_expired(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id || !t.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(&self, category: NewCategory) -> Result<Category, DatabaseError> {
        let mut categories = self.categories.lock().unwrap();
        let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category {
            id,
            name: category.name,
            user_id: Some(category.user_id),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Category>, DatabaseError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id.map_or(true, |owner| owner == user_id))
            .cloned()
            .collect())
    }

    async fn delete_owned(&self, id: i32, user_id: Uuid) -> Result<u64, DatabaseError> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.id == id && c.user_id == Some(user_id)));
        Ok((before - categories.len()) as u64)
    }
}

#[async_trait]
impl CreditCardRepository for MemoryStore {
    async fn insert(&self, card: NewCreditCard) -> Result<CreditCard, DatabaseError> {
        let now = self.now();
        let card = CreditCard {
            id: Uuid::new_v4(),
            user_id: card.user_id,
            card_name: card.card_name,
            total_limit: card.total_limit,
            current_limit: card.current_limit,
            due_date: card.due_date,
            created_at: now,
            updated_at: now,
        };
        self.credit_cards.lock().unwrap().push(card.clone());
        Ok(card)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<CreditCard>, DatabaseError> {
        Ok(self
            .credit_cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCard>, DatabaseError> {
        Ok(self.credit_cards.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut cards = self.credit_cards.lock().unwrap();
        let before = cards.len();
        cards.retain(|c| c.id != id);
        Ok((before - cards.len()) as u64)
    }
}

#[async_trait]
impl SimpleExpenseRepository for MemoryStore {
    async fn insert(&self, expense: NewSimpleExpense) -> Result<SimpleExpense, DatabaseError> {
        let now = self.now();
        let expense = SimpleExpense {
            id: Uuid::new_v4(),
            user_id: expense.user_id,
            category_id: expense.category_id,
            amount: expense.amount,
            description: expense.description,
            date: expense.date,
            created_at: now,
            updated_at: now,
        };
        self.simple_expenses.lock().unwrap().push(expense.clone());
        Ok(expense)
    }

    async fn update(&self, patch: SimpleExpensePatch) -> Result<Option<SimpleExpense>, DatabaseError> {
        let now = self.now();
        let mut rows = self.simple_expenses.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|e| e.id == patch.id && e.user_id == patch.user_id)
            .map(|e| {
                patch.apply_to(e);
                e.updated_at = now;
                e.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut rows = self.simple_expenses.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SimpleExpense>, DatabaseError> {
        Ok(self.simple_expenses.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &SimpleExpenseFilters,
    ) -> Result<Vec<SimpleExpense>, DatabaseError> {
        let mut rows: Vec<_> = self
            .simple_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && filters.matches(e))
            .cloned()
            .collect();
        newest_first(&mut rows, |e| (e.date, e.created_at));
        Ok(filters.base.page.apply(rows))
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<SimpleExpense>, DatabaseError> {
        Ok(self
            .simple_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= range.start && e.date <= range.end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecurringExpenseRepository for MemoryStore {
    async fn insert(&self, expense: NewRecurringExpense) -> Result<RecurringExpense, DatabaseError> {
        let now = self.now();
        let expense = RecurringExpense {
            id: Uuid::new_v4(),
            user_id: expense.user_id,
            category_id: expense.category_id,
            amount: expense.amount,
            description: expense.description,
            date: expense.date,
            card_id: expense.card_id,
            start_date: expense.start_date,
            end_date: expense.end_date,
            frequency: expense.frequency,
            created_at: now,
            updated_at: now,
        };
        self.recurring_expenses.lock().unwrap().push(expense.clone());
        Ok(expense)
    }

    async fn update(
        &self,
        patch: RecurringExpensePatch,
    ) -> Result<Option<RecurringExpense>, DatabaseError> {
        let now = self.now();
        let mut rows = self.recurring_expenses.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|e| e.id == patch.id && e.user_id == patch.user_id)
            .map(|e| {
                patch.apply_to(e);
                e.updated_at = now;
                e.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut rows = self.recurring_expenses.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        self.occurrences
            .lock()
            .unwrap()
            .retain(|o| o.recurring_expense_id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RecurringExpense>, DatabaseError> {
        Ok(self
            .recurring_expenses
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &RecurringExpenseFilters,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        let mut rows: Vec<_> = self
            .recurring_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && filters.matches(e))
            .cloned()
            .collect();
        newest_first(&mut rows, |e| (e.date, e.created_at));
        Ok(filters.base.page.apply(rows))
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        Ok(self
            .recurring_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= range.start && e.date <= range.end)
            .cloned()
            .collect())
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        target: NaiveDate,
    ) -> Result<Vec<RecurringExpense>, DatabaseError> {
        let mut rows: Vec<_> = self
            .recurring_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.start_date <= target)
            .cloned()
            .collect();
        rows.sort_by_key(|e| (e.start_date, e.created_at));
        Ok(rows)
    }

    async fn latest_occurrences(
        &self,
        user_id: Uuid,
    ) -> Result<HashMap<Uuid, NaiveDate>, DatabaseError> {
        let mut latest: HashMap<Uuid, NaiveDate> = HashMap::new();
        for o in self.occurrences.lock().unwrap().iter().filter(|o| o.user_id == user_id) {
            let entry = latest.entry(o.recurring_expense_id).or_insert(o.date);
            if o.date > *entry {
                *entry = o.date;
            }
        }
        Ok(latest)
    }

    async fn insert_occurrences(
        &self,
        occurrences: Vec<NewRecurringOccurrence>,
    ) -> Result<Vec<RecurringOccurrence>, DatabaseError> {
        let now = self.now();
        let mut stored = self.occurrences.lock().unwrap();
        let mut created = Vec::new();
        for o in occurrences {
            let exists = stored
                .iter()
                .any(|s| s.recurring_expense_id == o.recurring_expense_id && s.date == o.date);
            if exists {
                continue;
            }
            let row = RecurringOccurrence {
                id: Uuid::new_v4(),
                recurring_expense_id: o.recurring_expense_id,
                user_id: o.user_id,
                category_id: o.category_id,
                amount: o.amount,
                description: o.description,
                date: o.date,
                card_id: o.card_id,
                created_at: now,
            };
            stored.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }
}

impl MemoryStore {
    fn credit_card_expense_row(&self, expense: NewCreditCardExpense) -> CreditCardExpense {
        let now = self.now();
        CreditCardExpense {
            id: Uuid::new_v4(),
            user_id: expense.user_id,
            category_id: expense.category_id,
            amount: expense.amount,
            description: expense.description,
            date: expense.date,
            card_id: expense.card_id,
            installment_amount: expense.installment_amount,
            installments_number: expense.installments_number,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl CreditCardExpenseRepository for MemoryStore {
    async fn insert(&self, expense: NewCreditCardExpense) -> Result<CreditCardExpense, DatabaseError> {
        let row = self.credit_card_expense_row(expense);
        self.credit_card_expenses.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        patch: CreditCardExpensePatch,
    ) -> Result<Option<CreditCardExpense>, DatabaseError> {
        let now = self.now();
        let mut rows = self.credit_card_expenses.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|e| e.id == patch.id && e.user_id == patch.user_id)
            .map(|e| {
                patch.apply_to(e);
                e.updated_at = now;
                e.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut rows = self.credit_card_expenses.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditCardExpense>, DatabaseError> {
        Ok(self
            .credit_card_expenses
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_filter(
        &self,
        user_id: Uuid,
        filters: &CreditCardExpenseFilters,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        let mut rows: Vec<_> = self
            .credit_card_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && filters.matches(e))
            .cloned()
            .collect();
        newest_first(&mut rows, |e| (e.date, e.created_at));
        Ok(filters.base.page.apply(rows))
    }

    async fn find_by_date_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        Ok(self
            .credit_card_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.date >= range.start && e.date <= range.end)
            .cloned()
            .collect())
    }

    async fn insert_many(
        &self,
        expenses: Vec<NewCreditCardExpense>,
    ) -> Result<Vec<CreditCardExpense>, DatabaseError> {
        let rows: Vec<_> = expenses
            .into_iter()
            .map(|e| self.credit_card_expense_row(e))
            .collect();
        self.credit_card_expenses
            .lock()
            .unwrap()
            .extend(rows.iter().cloned());
        Ok(rows)
    }
}

/// Router over a fresh `MemoryStore`, driven with `oneshot`
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(test_config(), store.repositories());
        Self {
            router: app(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Register a user and return `(access_token, refresh_token)`
    pub async fn signup_and_login(&self, username: &str) -> (String, String) {
        let email = format!("{username}@example.com");
        let (status, body) = self
            .request(
                Method::POST,
                "/users",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "first_name": "Test",
                    "last_name": "User",
                    "email": email,
                    "password": "abc12345"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        let (status, body) = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": "abc12345" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}

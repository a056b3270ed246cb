//! Domain services. Each service owns the business rules for one resource
//! and talks to storage only through the repository traits.

pub mod auth_service;
pub mod category_service;
pub mod credit_card_expense_service;
pub mod credit_card_service;
pub mod error;
pub mod recurring_expense_service;
pub mod schedule;
pub mod simple_expense_service;
pub mod user_service;

pub use auth_service::{AuthService, TokenPair};
pub use category_service::CategoryService;
pub use credit_card_expense_service::CreditCardExpenseService;
pub use credit_card_service::CreditCardService;
pub use error::{ServiceError, ServiceResult};
pub use recurring_expense_service::RecurringExpenseService;
pub use simple_expense_service::SimpleExpenseService;
pub use user_service::UserService;

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::TokenIssuer;
use crate::database::models::Owned;
use crate::database::repository::Repositories;

/// Unwrap a row fetched by id, treating someone else's row as absent
pub(crate) fn owned_by<T: Owned>(row: Option<T>, user_id: Uuid, what: &'static str) -> ServiceResult<T> {
    match row {
        Some(row) if row.owner_id() == user_id => Ok(row),
        _ => Err(ServiceError::NotFound(what)),
    }
}

pub(crate) fn require_positive_amount(amount: f64) -> ServiceResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::validation("amount", "amount must be greater than zero"))
    }
}

pub struct Services {
    pub users: UserService,
    pub auth: AuthService,
    pub categories: CategoryService,
    pub credit_cards: CreditCardService,
    pub simple_expenses: SimpleExpenseService,
    pub recurring_expenses: RecurringExpenseService,
    pub credit_card_expenses: CreditCardExpenseService,
}

impl Services {
    pub fn new(repos: &Repositories, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            auth: AuthService::new(repos.users.clone(), repos.refresh_tokens.clone(), tokens),
            categories: CategoryService::new(repos.categories.clone(), repos.users.clone()),
            credit_cards: CreditCardService::new(repos.credit_cards.clone()),
            simple_expenses: SimpleExpenseService::new(repos.simple_expenses.clone()),
            recurring_expenses: RecurringExpenseService::new(repos.recurring_expenses.clone()),
            credit_card_expenses: CreditCardExpenseService::new(repos.credit_card_expenses.clone()),
        }
    }
}

pub mod category;
pub mod credit_card;
pub mod credit_card_expense;
pub mod recurring_expense;
pub mod refresh_token;
pub mod simple_expense;
pub mod summary;
pub mod user;

pub use category::{Category, NewCategory};
pub use credit_card::{CreditCard, NewCreditCard};
pub use credit_card_expense::{CreditCardExpense, CreditCardExpensePatch, NewCreditCardExpense};
pub use recurring_expense::{
    Frequency, NewRecurringExpense, NewRecurringOccurrence, RecurringExpense, RecurringExpensePatch,
    RecurringOccurrence,
};
pub use refresh_token::{NewRefreshToken, RefreshToken};
pub use simple_expense::{NewSimpleExpense, SimpleExpense, SimpleExpensePatch};
pub use summary::{CreditCardExpenseSummary, RecurringExpenseSummary, SimpleExpenseSummary};
pub use user::{NewUser, User, UserCandidate};

use uuid::Uuid;

/// Rows that belong to exactly one user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Zero values in a merge patch mean "leave unchanged"
pub(crate) fn non_zero_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

pub(crate) fn non_zero_i32(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

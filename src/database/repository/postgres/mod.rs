mod categories;
mod credit_card_expenses;
mod credit_cards;
mod recurring_expenses;
mod refresh_tokens;
mod simple_expenses;
mod users;

pub use categories::PgCategoryRepository;
pub use credit_card_expenses::PgCreditCardExpenseRepository;
pub use credit_cards::PgCreditCardRepository;
pub use recurring_expenses::PgRecurringExpenseRepository;
pub use refresh_tokens::PgRefreshTokenRepository;
pub use simple_expenses::PgSimpleExpenseRepository;
pub use users::PgUserRepository;

// handlers/public/mod.rs - Public handlers (no authentication)

pub mod auth;
pub mod root;
pub mod users;

pub use auth::login;
pub use root::{health, root};
pub use users::register;

// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind `jwt_auth_middleware` and scopes its work
// to the authenticated `AuthUser`.

pub mod auth;
pub mod categories;
pub mod credit_cards;
pub mod expenses;

// handlers/mod.rs - HTTP handlers grouped by authentication requirement
//
// public/     no token required (service info, health, signup, login)
// protected/  bearer access token required; the caller arrives as an
//             `Extension<AuthUser>` injected by `jwt_auth_middleware`

pub mod protected;
pub mod public;

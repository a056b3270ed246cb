//! Router assembly and shared request state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::TokenIssuer;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::repository::Repositories;
use crate::database::HealthCheck;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::Services;

/// Everything a handler can reach, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
    pub tokens: Arc<TokenIssuer>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.security));
        let services = Arc::new(Services::new(&repos, tokens.clone()));
        Self {
            config: Arc::new(config),
            services,
            tokens,
            health: repos.health,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(public::register))
        .route("/signup", post(public::register))
        .route("/auth/login", post(public::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(category_routes())
        .merge(credit_card_routes())
        .merge(simple_expense_routes())
        .merge(recurring_expense_routes())
        .merge(credit_card_expense_routes())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/auth/refresh", get(auth::refresh).post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route("/category", get(categories::list).post(categories::create))
        .route("/category/:id", delete(categories::delete))
}

fn credit_card_routes() -> Router<AppState> {
    use protected::credit_cards;

    Router::new()
        .route("/credit-cards", get(credit_cards::list).post(credit_cards::create))
        .route(
            "/credit-cards/:id",
            get(credit_cards::get).delete(credit_cards::delete),
        )
}

fn simple_expense_routes() -> Router<AppState> {
    use protected::expenses::simple;

    Router::new()
        .route(
            "/expenses/simple",
            get(simple::list).post(simple::create).put(simple::update),
        )
        .route("/expenses/simple/summary", get(simple::summary))
        .route(
            "/expenses/simple/:id",
            get(simple::get).put(simple::update_by_id).delete(simple::delete),
        )
}

fn recurring_expense_routes() -> Router<AppState> {
    use protected::expenses::recurring;

    Router::new()
        .route(
            "/expenses/recurring",
            get(recurring::list)
                .post(recurring::create)
                .put(recurring::update),
        )
        .route("/expenses/recurring/summary", get(recurring::summary))
        .route("/expenses/recurring/generate", post(recurring::generate))
        .route(
            "/expenses/recurring/:id",
            get(recurring::get)
                .put(recurring::update_by_id)
                .delete(recurring::delete),
        )
}

fn credit_card_expense_routes() -> Router<AppState> {
    use protected::expenses::credit_card;

    Router::new()
        .route(
            "/expenses/credit-card",
            get(credit_card::list)
                .post(credit_card::create)
                .put(credit_card::update),
        )
        .route("/expenses/credit-card/summary", get(credit_card::summary))
        .route(
            "/expenses/credit-card/installments/generate",
            post(credit_card::generate_installments),
        )
        .route(
            "/expenses/credit-card/:id",
            get(credit_card::get)
                .put(credit_card::update_by_id)
                .delete(credit_card::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

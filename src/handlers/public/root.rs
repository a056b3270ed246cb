// handlers/public/root.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service name, version and a map of the API
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "My Budget Planner API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "signup": "/users, /signup (public)",
            "login": "/auth/login (public)",
            "auth": "/auth/refresh, /auth/logout (protected)",
            "categories": "/category[/:id] (protected)",
            "credit_cards": "/credit-cards[/:id] (protected)",
            "expenses": "/expenses/{simple,recurring,credit-card}[/:id|/summary] (protected)",
            "generation": "/expenses/recurring/generate, /expenses/credit-card/installments/generate (protected)",
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

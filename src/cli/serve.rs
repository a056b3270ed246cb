use anyhow::Context;
use tracing::info;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::repository::Repositories;
use crate::database::Database;

pub async fn serve(config: AppConfig, migrate: bool) -> anyhow::Result<()> {
    let db = Database::connect_lazy(&config.database)?;
    if migrate {
        db.migrate().await.context("migration failed")?;
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, Repositories::postgres(&db));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Budget planner listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

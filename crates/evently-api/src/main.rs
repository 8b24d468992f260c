//! Evently API server binary.

use std::sync::Arc;

use evently_api::{create_router, state::AppState};
use evently_core::config::AppConfig;
use evently_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evently_api=debug,tower_http=debug".into()),
        )
        .init();

    // Fails fast without a signing secret.
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store);

    if let Some(bootstrap) = state.config.admin.clone() {
        state
            .users
            .ensure_admin(&bootstrap)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed admin account: {e}"))?;
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Evently API listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

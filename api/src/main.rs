//! SmartSite API server

use std::sync::Arc;

use anyhow::Context;
use smartsite_api::{
    build_router, config::AppConfig, middleware::auth::JwtKeys, AppState,
};
use smartsite_db::DbService;
use smartsite_screening::FeatureScreener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    if config.uses_dev_secret() {
        warn!("Using the development JWT secret; set SMARTSITE__AUTH__JWT_SECRET");
    }

    let db = DbService::connect(&config.database)
        .await
        .context("connecting to database")?;
    db.migrate().await.context("running migrations")?;

    let screener =
        FeatureScreener::from_config(&config.screening).context("building feature screener")?;

    let keys = JwtKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
    let state = Arc::new(AppState::new(db, keys, screener));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!("SmartSite API listening on {}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown requested");
}

//! ACRACS Engine — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! The scoring core is pure and lives in the library; everything here is
//! glue: env, tracing, metrics, and the listener.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use acracs_engine::api::{self, AppState};
use acracs_engine::config::advisory::{AdvisoryConfig, DEFAULT_ADVISORY_CONFIG_PATH};
use acracs_engine::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("acracs_engine=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let advisory_cfg = AdvisoryConfig::load_or_default(DEFAULT_ADVISORY_CONFIG_PATH);
    let metrics = Metrics::init(advisory_cfg.daily_limit);

    let state = AppState::new(&advisory_cfg);
    let app = api::create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "acracs-engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}

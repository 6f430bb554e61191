mod config;
mod errors;
mod form;
mod match_client;
mod models;
mod render;
mod routes;
mod sessions;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::match_client::MatchClient;
use crate::routes::build_router;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruitify web v{}", env!("CARGO_PKG_VERSION"));

    let matcher = MatchClient::new(
        config.match_api_base_url.clone(),
        config.upstream_timeout,
    );
    info!("Match API: {}", matcher.match_url());
    info!("Form style: {}", config.form_style);

    let session_ttl = chrono::Duration::from_std(config.session_ttl)
        .context("SESSION_TTL_SECS is out of range")?;

    let state = AppState {
        config: config.clone(),
        matcher: Arc::new(matcher),
        sessions: Arc::new(SessionStore::new(session_ttl, config.max_sessions)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

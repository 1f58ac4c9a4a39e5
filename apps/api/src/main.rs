mod affinda_client;
mod config;
mod errors;
mod parsing;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::affinda_client::AffindaClient;
use crate::config::Config;
use crate::parsing::sessions::UploadSessions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Parser v{}", env!("CARGO_PKG_VERSION"));

    if config.affinda_api_key.is_empty() {
        warn!("AFFINDA_API_KEY is not set; the parsing API will reject uploads");
    }

    let parser = AffindaClient::new(
        config.affinda_api_url.clone(),
        config.affinda_api_key.clone(),
        config.affinda_timeout,
    )?;
    info!(
        "Parsing client initialized (endpoint: {}, timeout: {:?})",
        config.affinda_api_url, config.affinda_timeout
    );

    let state = AppState {
        sessions: Arc::new(UploadSessions::new(Arc::new(parser), config.session_ttl)),
        config: config.clone(),
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

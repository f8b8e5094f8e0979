mod analysis;
mod config;
mod errors;
mod parser;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::vocabulary::Vocabulary;
use crate::config::Config;
use crate::parser::ResumeTextExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Build the skills dictionary once; handlers share it read-only
    let vocabulary = Vocabulary::builtin().context("Failed to build skills vocabulary")?;
    info!(
        "Skills vocabulary loaded: {} terms, {} multi-word",
        vocabulary.len(),
        vocabulary.multi_word_keys().count()
    );
    debug!("Vocabulary categories: {:?}", Vocabulary::builtin_category_sizes());

    let state = AppState {
        config: config.clone(),
        vocabulary: Arc::new(vocabulary),
        extractor: Arc::new(ResumeTextExtractor),
        started_at: Utc::now(),
    };

    // The browser client is served from another origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr} (upload limit {} bytes)", config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Sentiment API Server
//!
//! Loads the pipeline artifact once, then serves `/`, `/health`, `/ping` and
//! `/predict` until Ctrl+C. A missing or broken artifact does not stop the
//! server: `/predict` answers 503 until the artifact is fixed and the process
//! restarted.
//!
//! # Usage
//! ```sh
//! SERVER_PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `SERVER_BIND_ADDRESS` - Listen address (default: 0.0.0.0)
//! - `SERVER_PORT` - Listen port (default: 8000)
//! - `CORS_ALLOWED_ORIGINS` - `*` or comma-separated origins
//!   (default: http://localhost:3000,http://localhost:5173)
//! - `RUST_LOG` - Extra log directives

use anyhow::{Context, Result};
use sentiment_api::application::ml::ModelLoader;
use sentiment_api::application::prediction::PredictionService;
use sentiment_api::config::Config;
use sentiment_api::interfaces::http::{AppState, build_router};
use sentiment_api::interfaces::shutdown::wait_for_shutdown;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Sentiment API {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Bind={}:{}, CORS={:?}",
        config.server.bind_address, config.server.port, config.cors.allowed_origins
    );

    let model = ModelLoader::load(&ModelLoader::default_model_path());
    if !model.is_ready() {
        warn!("Starting without a model; /predict will answer 503.");
    }

    let state = AppState::new(PredictionService::new(Arc::new(model)), &config.cors);
    let app = build_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await
        .context("Server error")?;

    Ok(())
}

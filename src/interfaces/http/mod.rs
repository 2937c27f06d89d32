//! HTTP surface: routes, CORS policy and request logging.

pub mod error;
pub mod handlers;
pub mod middleware;

use crate::application::prediction::PredictionService;
use crate::config::{AllowedOrigins, CorsEnvConfig};
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub predictions: PredictionService,
    pub allowed_origins: Arc<AllowedOrigins>,
}

impl AppState {
    pub fn new(predictions: PredictionService, cors: &CorsEnvConfig) -> Self {
        Self {
            predictions,
            allowed_origins: Arc::new(cors.allowed_origins.clone()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/ping", get(handlers::ping_handler))
        .route("/predict", post(handlers::predict_handler))
        .layer(from_fn_with_state(state.clone(), middleware::cors_middleware))
        .layer(from_fn(middleware::request_log_middleware))
        .with_state(state)
}

use super::AppState;
use super::error::ApiError;
use crate::application::ml::ModelState;
use crate::domain::prediction::{PredictionRequest, PredictionResponse, timestamp_now};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

pub const SERVICE_NAME: &str = "sentiment-analyzer";

fn model_status(model: &ModelState) -> Value {
    match model {
        ModelState::Ready(classifier) => json!({
            "loaded": true,
            "name": classifier.name(),
            "version": classifier.version(),
            "classes": classifier.classes(),
        }),
        ModelState::Unavailable { reason } => json!({
            "loaded": false,
            "reason": reason,
        }),
    }
}

pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Sentiment Analysis API is running",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "predict": "POST /predict",
            "health": "GET /health",
            "ping": "GET /ping",
        },
        "model": model_status(state.predictions.model()),
        "timestamp": timestamp_now(),
    }))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": timestamp_now(),
    }))
}

pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

pub async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.predictions.predict(request.text).await?;
    Ok(Json(response))
}

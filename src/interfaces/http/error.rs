use crate::domain::errors::PredictionError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

/// Failure of an HTTP request, rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Prediction(PredictionError),
    /// Body missing, not JSON, or without a string `text` field
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Prediction(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Prediction(PredictionError::ModelUnavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Prediction(e) => e.to_string(),
            Self::InvalidBody(reason) => reason.clone(),
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        Self::Prediction(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!("{} responding to request: {}", status, detail);
        } else {
            warn!("Rejected request ({}): {}", status, detail);
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upper bound on accepted input, counted in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Keys owned by the response envelope. Native pipeline output never overrides them.
pub const RESERVED_KEYS: &[&str] = &[
    "success",
    "text",
    "text_length",
    "timestamp",
    "sentiment",
    "confidence",
];

/// RFC 3339 generation timestamp for response bodies.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

/// Raw key/value output of a pipeline, before normalization.
pub type NativeOutput = Map<String, Value>;

/// Normalized judgment for a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Lowercased label
    pub sentiment: String,
    /// Rounded to 3 decimals
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub text: String,
    pub text_length: usize,
    pub timestamp: String,
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Pass-through keys from the native output (e.g. `probabilities`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

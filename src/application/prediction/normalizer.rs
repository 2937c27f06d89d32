//! Maps a model's native output onto the public prediction contract.
//!
//! Models may report their judgment as `sentiment`/`confidence` or with the
//! alternative keys `prediction`/`label` and `probability`. Whatever the shape,
//! the response always carries a lowercase `sentiment` string and a
//! `confidence` float rounded to three decimals.

use crate::domain::errors::PredictionError;
use crate::domain::prediction::{
    NativeOutput, PredictionResponse, PredictionResult, RESERVED_KEYS,
};
use serde_json::{Map, Value};

const SENTIMENT_KEYS: &[&str] = &["sentiment", "prediction", "label"];
const CONFIDENCE_KEYS: &[&str] = &["confidence", "probability"];

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn first_present<'a>(native: &'a NativeOutput, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| native.get(*key))
        .find(|value| !value.is_null())
}

fn coerce_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}

/// Numeric probability in `[0, 1]`, rounded. NaN and out-of-range values are rejected.
fn coerce_confidence(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (0.0..=1.0).contains(&raw).then(|| round3(raw))
}

/// Extract the canonical `sentiment`/`confidence` pair from native output.
pub fn normalize_result(native: &NativeOutput) -> Result<PredictionResult, PredictionError> {
    let sentiment = first_present(native, SENTIMENT_KEYS)
        .map(coerce_label)
        .ok_or_else(|| PredictionError::InferenceFailure {
            message: "model output has no sentiment, prediction or label".to_string(),
        })?;

    let confidence_value = first_present(native, CONFIDENCE_KEYS).ok_or_else(|| {
        PredictionError::InferenceFailure {
            message: "model output has no confidence or probability".to_string(),
        }
    })?;
    let confidence =
        coerce_confidence(confidence_value).ok_or_else(|| PredictionError::InferenceFailure {
            message: format!("confidence is not a probability: {}", confidence_value),
        })?;

    Ok(PredictionResult {
        sentiment,
        confidence,
    })
}

/// Build the full response for `text` from the model's native output.
pub fn normalize(
    text: &str,
    native: NativeOutput,
    timestamp: String,
) -> Result<PredictionResponse, PredictionError> {
    let result = normalize_result(&native)?;

    let extra: Map<String, Value> = native
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();

    Ok(PredictionResponse {
        success: true,
        text: text.to_string(),
        text_length: text.chars().count(),
        timestamp,
        result,
        extra,
    })
}

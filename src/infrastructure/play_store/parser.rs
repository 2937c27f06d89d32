//! Decoding of Google Play `batchexecute` review responses.
//!
//! The body is an anti-XSSI prefix (`)]}'`) followed by a JSON envelope whose
//! third element is itself a JSON-encoded string holding
//! `[reviews, ..., [.., continuation_token], ..]`. Each review is a positional
//! array; the indices below map it onto [`Review`] columns.

use crate::domain::errors::ScrapeError;
use crate::domain::ports::ReviewPage;
use crate::domain::review::Review;
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

const XSSI_PREFIX: &str = ")]}'";

fn at_path<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, &i| v.get(i))
}

fn string_at(value: &Value, path: &[usize]) -> Option<String> {
    at_path(value, path)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn timestamp_at(value: &Value, path: &[usize]) -> Option<NaiveDateTime> {
    at_path(value, path)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

/// Map one positional review array. Returns `None` when the mandatory id or date is missing.
pub fn parse_review(raw: &Value) -> Option<Review> {
    Some(Review {
        review_id: string_at(raw, &[0])?,
        user_name: string_at(raw, &[1, 0]).unwrap_or_default(),
        user_image: string_at(raw, &[1, 1, 3, 2]),
        content: string_at(raw, &[4]),
        score: at_path(raw, &[2])
            .and_then(Value::as_u64)
            .and_then(|s| u8::try_from(s).ok())
            .unwrap_or(0),
        thumbs_up_count: at_path(raw, &[6]).and_then(Value::as_u64).unwrap_or(0),
        review_created_version: string_at(raw, &[10]),
        at: timestamp_at(raw, &[5, 0])?,
        reply_content: string_at(raw, &[7, 1]),
        replied_at: timestamp_at(raw, &[7, 2, 0]),
        app_version: string_at(raw, &[10]),
    })
}

/// Decode a full `batchexecute` response body into a page of reviews.
pub fn parse_reviews_response(body: &str) -> Result<ReviewPage, ScrapeError> {
    let json_part = body
        .trim_start()
        .strip_prefix(XSSI_PREFIX)
        .ok_or_else(|| ScrapeError::MalformedResponse {
            reason: "missing )]}' prefix".to_string(),
        })?;

    let envelope: Value =
        serde_json::from_str(json_part.trim()).map_err(|e| ScrapeError::MalformedResponse {
            reason: format!("envelope is not JSON: {}", e),
        })?;

    // An empty result set comes back with a null payload
    let Some(payload_str) = at_path(&envelope, &[0, 2]).and_then(Value::as_str) else {
        return Ok(ReviewPage::default());
    };

    let payload: Value =
        serde_json::from_str(payload_str).map_err(|e| ScrapeError::MalformedResponse {
            reason: format!("payload is not JSON: {}", e),
        })?;

    let reviews = payload
        .get(0)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_review).collect())
        .unwrap_or_default();

    let continuation = payload
        .as_array()
        .filter(|items| items.len() >= 2)
        .and_then(|items| items[items.len() - 2].as_array())
        .and_then(|token_slot| token_slot.last())
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReviewPage {
        reviews,
        continuation,
    })
}

use super::parser::parse_reviews_response;
use crate::domain::errors::ScrapeError;
use crate::domain::ports::{ReviewPage, ReviewQuery, ReviewSource};
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Value, json};
use tracing::{debug, info};

pub const PLAY_STORE_BASE_URL: &str = "https://play.google.com";
const BATCH_EXECUTE_PATH: &str = "/_/PlayStoreUi/data/batchexecute";
const REVIEWS_RPC_ID: &str = "UsvDTd";

/// The store rejects pages above this size.
pub const MAX_REVIEWS_PER_PAGE: usize = 199;

/// Newest reviews first
const SORT_NEWEST: u8 = 2;

pub struct GooglePlayReviews {
    client: ClientWithMiddleware,
    base_url: String,
}

impl Default for GooglePlayReviews {
    fn default() -> Self {
        Self::new()
    }
}

impl GooglePlayReviews {
    pub fn new() -> Self {
        Self::with_base_url(PLAY_STORE_BASE_URL)
    }

    /// Point the source at another host (used against local fakes).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `f.req` form value for one reviews RPC call.
    pub fn request_payload(app_id: &str, page_size: usize, continuation: Option<&str>) -> String {
        let paging = json!([page_size, Value::Null, continuation]);
        let inner = json!([
            Value::Null,
            Value::Null,
            [2, SORT_NEWEST, paging, Value::Null, []],
            [app_id, 7]
        ]);
        json!([[[REVIEWS_RPC_ID, inner.to_string(), Value::Null, "generic"]]]).to_string()
    }
}

#[async_trait]
impl ReviewSource for GooglePlayReviews {
    async fn fetch_page(
        &self,
        query: &ReviewQuery,
        page_size: usize,
        continuation: Option<&str>,
    ) -> Result<ReviewPage> {
        let url = build_url_with_query(
            &format!("{}{}", self.base_url, BATCH_EXECUTE_PATH),
            &[("hl", query.lang.as_str()), ("gl", query.country.as_str())],
        )
        .context("Failed to build reviews URL")?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(
                "f.req",
                &Self::request_payload(&query.app_id, page_size, continuation),
            )
            .finish();

        debug!(
            "Fetching up to {} reviews for {} (token: {:?})",
            page_size, query.app_id, continuation
        );

        let response = self
            .client
            .post(url.as_str())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .body(body)
            .send()
            .await
            .map_err(|e| ScrapeError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                app_id: query.app_id.clone(),
            }
            .into());
        }

        let text = response
            .text()
            .await
            .context("Failed to read reviews response body")?;
        let page = parse_reviews_response(&text)?;

        info!(
            "Fetched {} reviews for {} ({})",
            page.reviews.len(),
            query.app_id,
            if page.continuation.is_some() {
                "more available"
            } else {
                "last page"
            }
        );
        Ok(page)
    }

    fn max_page_size(&self) -> usize {
        MAX_REVIEWS_PER_PAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_payload() {
        let payload = GooglePlayReviews::request_payload("com.example.app", 199, None);
        assert_eq!(
            payload,
            r#"[[["UsvDTd","[null,null,[2,2,[199,null,null],null,[]],[\"com.example.app\",7]]",null,"generic"]]]"#
        );
    }

    #[test]
    fn test_continuation_payload() {
        let payload = GooglePlayReviews::request_payload("com.example.app", 50, Some("tok"));
        assert!(payload.contains(r#"[50,null,\"tok\"]"#));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = GooglePlayReviews::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(source.base_url, "http://127.0.0.1:9999");
        assert_eq!(source.max_page_size(), MAX_REVIEWS_PER_PAGE);
    }
}

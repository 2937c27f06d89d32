use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("sentiment-api/", env!("CARGO_PKG_VERSION"));

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    pub fn create_client() -> ClientWithMiddleware {
        // Retry policy:
        // - Exponential backoff
        // - Max 3 retries on transient failures (5xx, 429, connection errors)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Append query parameters to `base_url`.
/// reqwest-middleware's builder has no `.query()`, so the URL is built up front.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> Result<Url, url::ParseError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    Url::parse_with_params(
        base_url,
        params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())),
    )
}

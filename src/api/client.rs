//! REST client core: rate-limit retry and cursor pagination.
//!
//! Every endpoint goes through [`RestClient::call`], which retries 429
//! responses with a capped exponential backoff. List endpoints go through
//! [`RestClient::paginate`], which follows `pagination.cursor` until the
//! server stops returning one.

use dashmap::DashMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ApiError;
use super::http::{HttpClient, HttpResponse};
use super::types::Page;
use crate::config::ApiConfig;

/// Status code the API uses for rate limiting.
const TOO_MANY_REQUESTS: u16 = 429;

/// Bounded retry policy for rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_limit: u32,
    base: Duration,
    max: Duration,
}

impl RetryPolicy {
    /// Build a policy, rejecting a zero retry limit or an unbounded backoff.
    pub fn new(retry_limit: u32, base: Duration, max: Duration) -> Result<Self, ApiError> {
        if retry_limit == 0 {
            return Err(ApiError::InvalidRetryLimit(retry_limit));
        }
        if base.is_zero() || base > max {
            return Err(ApiError::InvalidBackoff);
        }
        Ok(Self {
            retry_limit,
            base,
            max,
        })
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped.
    pub fn delay(&self, retry: u32) -> Duration {
        self.base
            .checked_mul(1u32 << retry.min(16))
            .map_or(self.max, |d| d.min(self.max))
    }
}

/// Per-call retry bookkeeping.
#[derive(Debug)]
struct RetryState {
    attempts_remaining: u32,
    last_status: Option<u16>,
}

/// Which credentials a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Client id and bearer token, when configured.
    Helix,
    /// No credential headers at all.
    Anonymous,
}

/// Client for the Helix API and the legacy chatters endpoint.
pub struct RestClient {
    http: Arc<dyn HttpClient>,
    policy: RetryPolicy,
    client_id: Option<String>,
    oauth_token: Option<String>,
    pub(crate) helix_url: String,
    pub(crate) chatters_url: String,
    /// login -> user id, kept for the lifetime of the client
    pub(crate) user_ids: DashMap<String, String>,
}

impl RestClient {
    /// Create a client from configuration.
    ///
    /// Fails if the retry policy in `config` is invalid.
    pub fn new(http: Arc<dyn HttpClient>, config: &ApiConfig) -> Result<Self, ApiError> {
        let policy = RetryPolicy::new(
            config.retry_limit,
            config.backoff_base(),
            config.backoff_max(),
        )?;

        if config.client_id.is_none() {
            warn!(
                "no client id configured; only the chatters endpoint will work (chat itself is unaffected)"
            );
        }

        Ok(Self {
            http,
            policy,
            client_id: config.client_id.clone(),
            oauth_token: config.oauth_token.clone(),
            helix_url: config.helix_url.trim_end_matches('/').to_string(),
            chatters_url: config.chatters_url.trim_end_matches('/').to_string(),
            user_ids: DashMap::new(),
        })
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fail fast with [`ApiError::MissingCredential`] when no client id is set.
    pub(crate) fn require_client_id(&self) -> Result<(), ApiError> {
        match self.client_id {
            Some(_) => Ok(()),
            None => Err(ApiError::MissingCredential),
        }
    }

    fn headers(&self, auth: Auth) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();
        if auth == Auth::Helix {
            if let Some(id) = &self.client_id {
                headers.push(("Client-ID", id.clone()));
            }
            if let Some(token) = &self.oauth_token {
                let token = token.strip_prefix("oauth:").unwrap_or(token);
                headers.push(("Authorization", format!("Bearer {token}")));
            }
        }
        headers
    }

    /// Call `url`, retrying while the API answers 429.
    ///
    /// Makes at most `retry_limit + 1` attempts. Any status other than 429
    /// is returned as-is; interpreting it is up to the caller.
    pub async fn call(&self, method: Method, url: &str) -> Result<HttpResponse, ApiError> {
        self.call_with(method, url, Auth::Helix).await
    }

    pub(crate) async fn call_with(
        &self,
        method: Method,
        url: &str,
        auth: Auth,
    ) -> Result<HttpResponse, ApiError> {
        if method != Method::GET && method != Method::POST {
            return Err(ApiError::InvalidMethod(method.to_string()));
        }

        let headers = self.headers(auth);
        let mut state = RetryState {
            attempts_remaining: self.policy.retry_limit,
            last_status: None,
        };

        loop {
            let response = self.http.request(&method, url, &headers).await?;
            debug!(%method, url, status = response.status, "api response");

            if response.status != TOO_MANY_REQUESTS {
                return Ok(response);
            }

            state.last_status = Some(response.status);
            if state.attempts_remaining == 0 {
                warn!(url, last_status = ?state.last_status, "rate limit retries exhausted");
                return Err(ApiError::RateLimitExceeded {
                    retry_limit: self.policy.retry_limit,
                });
            }

            let retry = self.policy.retry_limit - state.attempts_remaining;
            state.attempts_remaining -= 1;
            let delay = self.policy.delay(retry);
            warn!(
                url,
                retries_left = state.attempts_remaining,
                delay_ms = delay.as_millis() as u64,
                "api rate limit hit, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// GET `url` and decode a 200 response; any other status is an error.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let response = self.call_with(Method::GET, url, auth).await?;
        if response.status != 200 {
            return Err(ApiError::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        response.json(url)
    }

    /// Collect every page of a list endpoint.
    ///
    /// `base_url` must already carry a query string; each request appends
    /// `&after=<cursor>`, starting from an empty cursor. The loop ends when
    /// a page has no cursor. A server that keeps returning cursors keeps
    /// the loop going; there is no page cap.
    pub async fn paginate<T: DeserializeOwned>(&self, base_url: &str) -> Result<Vec<T>, ApiError> {
        let mut cursor = String::new();
        let mut accumulated = Vec::new();

        loop {
            let url = format!("{base_url}&after={cursor}");
            let page: Page<T> = self.get_json(&url, Auth::Helix).await?;
            accumulated.extend(page.data);

            match page
                .pagination
                .and_then(|p| p.cursor)
                .filter(|c| !c.is_empty())
            {
                Some(next) => cursor = next,
                None => {
                    debug!(base_url, records = accumulated.len(), "pagination complete");
                    return Ok(accumulated);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::ScriptedHttp;
    use serde_json::{Value, json};

    fn config(retry_limit: u32) -> ApiConfig {
        ApiConfig {
            client_id: Some("cid".into()),
            oauth_token: Some("oauth:tok".into()),
            retry_limit,
            backoff_base_ms: 1,
            backoff_max_ms: 2,
            ..ApiConfig::default()
        }
    }

    fn client(http: &Arc<ScriptedHttp>, retry_limit: u32) -> RestClient {
        RestClient::new(http.clone(), &config(retry_limit)).unwrap()
    }

    #[test]
    fn test_zero_retry_limit_rejected() {
        let http: Arc<dyn HttpClient> = Arc::new(ScriptedHttp::default());
        let err = RestClient::new(http, &config(0)).err().unwrap();
        assert!(matches!(err, ApiError::InvalidRetryLimit(0)));
    }

    #[test]
    fn test_backoff_is_capped_exponential() {
        let policy =
            RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(350)).unwrap();
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(350));
        assert_eq!(policy.delay(40), Duration::from_millis(350));
    }

    #[test]
    fn test_unbounded_backoff_rejected() {
        assert!(matches!(
            RetryPolicy::new(1, Duration::ZERO, Duration::from_secs(1)),
            Err(ApiError::InvalidBackoff)
        ));
        assert!(matches!(
            RetryPolicy::new(1, Duration::from_secs(2), Duration::from_secs(1)),
            Err(ApiError::InvalidBackoff)
        ));
    }

    #[tokio::test]
    async fn test_succeeds_after_retry_limit_429s() {
        let http = Arc::new(ScriptedHttp::default());
        for _ in 0..3 {
            http.push_json(429, json!({}));
        }
        http.push_json(200, json!({"data": []}));

        let response = client(&http, 3).call(Method::GET, "http://api/x").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(http.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_fails_after_retry_limit_plus_one_429s() {
        let http = Arc::new(ScriptedHttp::default());
        for _ in 0..4 {
            http.push_json(429, json!({}));
        }
        http.push_json(200, json!({}));

        let err = client(&http, 3).call(Method::GET, "http://api/x").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimitExceeded { retry_limit: 3 }));
        assert_eq!(http.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_other_statuses_returned_as_is() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(503, json!({"error": "down"}));

        let response = client(&http, 3).call(Method::GET, "http://api/x").await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_method_fails_without_request() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(200, json!({}));

        let err = client(&http, 3).call(Method::DELETE, "http://api/x").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidMethod(ref m) if m == "DELETE"));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_post_is_sent_as_post() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(200, json!({}));

        client(&http, 1).call(Method::POST, "http://api/x").await.unwrap();
        assert_eq!(http.requests()[0].method, Method::POST);
    }

    #[tokio::test]
    async fn test_helix_headers() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(200, json!({}));

        client(&http, 1).call(Method::GET, "http://api/x").await.unwrap();
        let request = &http.requests()[0];
        assert_eq!(request.header("Client-ID"), Some("cid"));
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_paginate_follows_cursor_until_absent() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(
            200,
            json!({"data": [{"n": "A"}, {"n": "B"}], "pagination": {"cursor": "x"}}),
        );
        http.push_json(200, json!({"data": [{"n": "C"}], "pagination": {"cursor": null}}));

        let records: Vec<Value> = client(&http, 1)
            .paginate("http://api/follows?first=100")
            .await
            .unwrap();

        let names: Vec<&str> = records.iter().filter_map(|r| r["n"].as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(
            http.urls(),
            vec![
                "http://api/follows?first=100&after=",
                "http://api/follows?first=100&after=x"
            ]
        );
    }

    #[tokio::test]
    async fn test_paginate_stops_on_empty_pagination_object() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(200, json!({"data": [1, 2], "pagination": {}}));

        let records: Vec<u32> = client(&http, 1).paginate("http://api/l?a=1").await.unwrap();
        assert_eq!(records, vec![1, 2]);
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_paginate_surfaces_unexpected_status() {
        let http = Arc::new(ScriptedHttp::default());
        http.push_json(200, json!({"data": [1], "pagination": {"cursor": "x"}}));
        http.push_json(500, json!({}));

        let err = client(&http, 1)
            .paginate::<u32>("http://api/l?a=1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 500, .. }));
    }
}

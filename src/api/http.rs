//! HTTP seam for the REST client.
//!
//! [`RestClient`](super::RestClient) only needs "send this request, give me
//! status and body". [`ReqwestHttp`] does that over the network;
//! [`ScriptedHttp`] replays canned responses for tests and offline runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::time::Duration;

use super::error::ApiError;

/// Timeout for a single HTTP request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Minimal HTTP client interface.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform one request. Fails only for network-level problems; any HTTP
    /// status, including errors, is returned as a response.
    async fn request(
        &self,
        method: &Method,
        url: &str,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse, ApiError>;
}

/// [`HttpClient`] backed by reqwest.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("tmibot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for ReqwestHttp {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttp {
    async fn request(
        &self,
        method: &Method,
        url: &str,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse, ApiError> {
        let mut request = self.client.request(method.clone(), url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// A request seen by [`ScriptedHttp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of a header, if it was sent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// [`HttpClient`] that answers with a fixed sequence of responses.
///
/// Running past the end of the script is reported as a network error.
#[derive(Default)]
pub struct ScriptedHttp {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttp {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a JSON response with the given status.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.responses
            .lock()
            .push_back(HttpResponse::new(status, body.to_string()));
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// URLs requested so far, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn request(
        &self,
        method: &Method,
        url: &str,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse, ApiError> {
        self.requests.lock().push(RecordedRequest {
            method: method.clone(),
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.clone()))
                .collect(),
        });

        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| ApiError::Network(format!("no scripted response for {url}").into()))
    }
}

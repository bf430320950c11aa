//! API error taxonomy.

use thiserror::Error;

/// Boxed source error for transport-level HTTP failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the REST client and its endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Host unreachable, timeout, or a broken connection.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// Every attempt was answered with 429.
    #[error("rate limit retries exhausted ({retry_limit})")]
    RateLimitExceeded { retry_limit: u32 },

    /// A status other than 200 where success was expected.
    #[error("expected a 200 response from {url}, got {status}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("streamer {0} is not live")]
    StreamerNotLive(String),

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("game {0} not found")]
    GameNotFound(String),

    #[error("user {user} was not found in the chatters list of {channel}")]
    UserNotInChatters { user: String, channel: String },

    /// The endpoint needs a client id and none is configured.
    #[error("client id is needed for this request")]
    MissingCredential,

    #[error("unsupported http method: {0}")]
    InvalidMethod(String),

    #[error("retry limit must be positive, got {0}")]
    InvalidRetryLimit(u32),

    #[error("backoff delay must be positive and bounded")]
    InvalidBackoff,

    #[error("follow lookup needs a from or to user")]
    MissingFollowTarget,

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::StreamerNotLive(_) => "streamer_not_live",
            Self::UserNotFound(_) => "user_not_found",
            Self::GameNotFound(_) => "game_not_found",
            Self::UserNotInChatters { .. } => "user_not_in_chatters",
            Self::MissingCredential => "missing_credential",
            Self::InvalidMethod(_) => "invalid_method",
            Self::InvalidRetryLimit(_) => "invalid_retry_limit",
            Self::InvalidBackoff => "invalid_backoff",
            Self::MissingFollowTarget => "missing_follow_target",
            Self::Decode { .. } => "decode_error",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

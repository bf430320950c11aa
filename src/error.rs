//! Unified error handling for tmibot.
//!
//! `HandlerError` is what a single dispatch can fail with and is routed to
//! the error handler. `BotError` is what stops the bot: setup mistakes,
//! a dropped connection, or a failing error handler.

use crate::api::ApiError;
use crate::config::ConfigError;
use thiserror::Error;
use tmi_proto::TransportError;

// ============================================================================
// Handler Errors (message processing)
// ============================================================================

/// Errors that can occur while processing one chat message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("command {0:?} not found")]
    CommandNotFound(String),

    #[error("missing argument #{index}")]
    MissingArgument { index: usize },

    #[error("invalid argument #{index} ({value:?}): {reason}")]
    InvalidArgument {
        index: usize,
        value: String,
        reason: String,
    },

    #[error("expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("outbound queue closed")]
    SendClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Wrap an arbitrary message as a handler failure.
    pub fn other(msg: impl std::fmt::Display) -> Self {
        Self::Other(anyhow::anyhow!("{msg}"))
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CommandNotFound(_) => "command_not_found",
            Self::MissingArgument { .. } => "missing_argument",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::ArgumentCount { .. } => "argument_count",
            Self::Api(e) => e.error_code(),
            Self::SendClosed => "send_closed",
            Self::Other(_) => "handler_error",
        }
    }
}

/// Result type for command and event handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Bot Errors (setup and run loop)
// ============================================================================

/// Errors that stop the bot or reject its configuration.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("api client error: {0}")]
    Api(#[from] ApiError),

    #[error("unknown event: {0:?}")]
    UnknownEvent(String),

    #[error("event {event:?} cannot take a {got:?} handler")]
    EventMismatch {
        event: &'static str,
        got: &'static str,
    },

    #[error("not connected")]
    NotConnected,

    #[error("error handler failed: {0}")]
    ErrorHandler(#[source] HandlerError),
}

impl BotError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_failure",
            Self::Config(_) => "config_error",
            Self::Api(e) => e.error_code(),
            Self::UnknownEvent(_) => "unknown_event",
            Self::EventMismatch { .. } => "event_mismatch",
            Self::NotConnected => "not_connected",
            Self::ErrorHandler(_) => "error_handler_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(
            HandlerError::CommandNotFound("x".into()).error_code(),
            "command_not_found"
        );
        assert_eq!(
            HandlerError::Api(ApiError::RateLimitExceeded { retry_limit: 3 }).error_code(),
            "rate_limit_exceeded"
        );
        assert_eq!(HandlerError::other("boom").error_code(), "handler_error");
    }

    #[test]
    fn test_api_errors_stay_transparent() {
        let err = HandlerError::from(ApiError::StreamerNotLive("bob".into()));
        assert_eq!(err.to_string(), "streamer bob is not live");
    }

    #[test]
    fn test_bot_error_wraps_transport() {
        let err = BotError::from(TransportError::Closed);
        assert_eq!(err.error_code(), "transport_failure");
        assert!(err.to_string().contains("connection closed"));
    }
}

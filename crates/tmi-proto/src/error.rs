//! Error types for the chat protocol library.
//!
//! Transport failures are fatal to a connection. Protocol errors only
//! affect the line they were raised for.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// I/O error while connecting, reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

/// Per-line framing errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error surfaced through the codec.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a line.
    ///
    /// The raw bytes are kept so callers can log or inspect what arrived.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// The raw line as bytes, terminator stripped.
        raw_line: Vec<u8>,
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
    },

    /// A line exceeded the maximum allowed length and was dropped.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Bytes seen when the limit was crossed.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}

/// Errors that can occur when reading a line from a transport.
///
/// Exhaustive so read loops can match both cases without a fallback arm.
#[derive(Debug, Error)]
pub enum TransportReadError {
    /// The transport failed; the connection is gone.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A single line could not be framed; later lines are unaffected.
    #[error("transport protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl TransportReadError {
    /// Whether the connection is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

//! Line framing over an arbitrarily chunked byte stream.
//!
//! [`LineCodec`] is a tokio [`Decoder`] that splits newline-terminated
//! lines out of a byte buffer. [`LineBuffer`] drives it against a
//! [`Transport`], pulling more bytes only when no complete line is buffered.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::error::{self, ProtocolError, TransportReadError};
use crate::transport::Transport;

/// Default maximum line length in bytes, terminator excluded.
///
/// Twitch lines carrying IRCv3 tags routinely exceed the 512 bytes of
/// RFC 1459, so the limit is generous.
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// Line-based codec that handles newline-terminated lines.
///
/// Decoded lines have their `\n` and any trailing `\r` removed.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Set while dropping the tail of an oversized line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Maximum line length this codec accepts.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn strip_terminator(line: &[u8]) -> &[u8] {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        line.strip_suffix(b"\r").unwrap_or(line)
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        // Look for newline starting from where we left off
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            // No complete line yet - remember where we stopped
            if src.len() > self.max_len {
                let actual = src.len();
                src.clear();
                self.next_index = 0;
                if !self.discarding {
                    self.discarding = true;
                    return Err(ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    });
                }
                return Ok(None);
            }
            self.next_index = src.len();
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if self.discarding {
            // Tail of a line that was already reported as too long
            self.discarding = false;
            return self.decode(src);
        }

        let body = Self::strip_terminator(&line);
        if body.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: body.len(),
                limit: self.max_len,
            });
        }

        String::from_utf8(body.to_vec())
            .map(Some)
            .map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.utf8_error().valid_up_to(),
                details: e.utf8_error().to_string(),
                raw_line: e.into_bytes(),
            })
    }
}

/// Presents a chunked transport as a FIFO sequence of lines.
///
/// Bytes that do not yet form a complete line stay buffered and are joined
/// with the next chunk, so a line split across reads comes out whole.
pub struct LineBuffer<T> {
    transport: T,
    codec: LineCodec,
    buf: BytesMut,
}

impl<T: Transport> LineBuffer<T> {
    /// Wrap a transport with the default line limit.
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, LineCodec::new())
    }

    /// Wrap a transport with a specific codec.
    pub fn with_codec(transport: T, codec: LineCodec) -> Self {
        Self {
            transport,
            codec,
            buf: BytesMut::with_capacity(4096),
        }
    }

    /// Read the next line, blocking on the transport only when nothing
    /// complete is buffered.
    ///
    /// Transport failures are returned unchanged and are not retried.
    /// Cancel safe as long as the transport's `receive` is: dropping the
    /// future between chunks loses no bytes.
    pub async fn read_line(&mut self) -> Result<String, TransportReadError> {
        loop {
            if let Some(line) = self.codec.decode(&mut self.buf)? {
                return Ok(line);
            }

            let chunk = self.transport.receive().await?;
            trace!(bytes = chunk.len(), "received chunk");
            self.buf.extend_from_slice(&chunk);
        }
    }

    /// Access the wrapped transport, e.g. to send on it.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Number of bytes buffered but not yet returned as a line.
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Unwrap the transport, dropping any buffered bytes.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

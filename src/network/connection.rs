//! Framed connection to the chat server.
//!
//! Owns the transport behind a [`LineBuffer`] so reads come out as whole
//! lines, and writes [`ClientLine`]s with their CRLF terminator.

use tmi_proto::{
    ClientLine, LineBuffer, LineCodec, Transport, TransportError, TransportReadError,
};
use tracing::{debug, trace};

/// A transport wrapped for line-oriented I/O.
pub struct Connection {
    lines: LineBuffer<Box<dyn Transport>>,
}

impl Connection {
    /// Wrap `transport`, rejecting inbound lines longer than `max_line_len`.
    pub fn new(transport: Box<dyn Transport>, max_line_len: usize) -> Self {
        Self {
            lines: LineBuffer::with_codec(transport, LineCodec::with_max_len(max_line_len)),
        }
    }

    /// Write one line. Secrets are masked in the log.
    pub async fn send(&mut self, line: &ClientLine) -> Result<(), TransportError> {
        if line.is_sensitive() {
            debug!(line = "PASS ********", "> sending");
        } else {
            debug!(line = %line, "> sending");
        }
        self.lines.transport_mut().send(&line.to_wire()).await
    }

    /// Read the next line, terminator stripped.
    pub async fn read_line(&mut self) -> Result<String, TransportReadError> {
        let line = self.lines.read_line().await?;
        trace!(line = %line, "< received");
        Ok(line)
    }
}

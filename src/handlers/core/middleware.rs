//! Outbound reply channel.
//!
//! Handlers never touch the transport. They push lines into an unbounded
//! queue through a [`ChatSender`], and the engine writes the queue to the
//! transport, in order, once the current dispatch returns.

use tmi_proto::ClientLine;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::HandlerError;

/// Cloneable capability to send lines to the chat server.
#[derive(Debug, Clone)]
pub struct ChatSender {
    tx: mpsc::UnboundedSender<ClientLine>,
}

impl ChatSender {
    /// Create a sender and the receiving end the engine drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a line. Never blocks.
    ///
    /// Fails only once the engine that owns the queue is gone.
    pub fn send(&self, line: ClientLine) -> Result<(), HandlerError> {
        trace!(line = %line, "queued outbound line");
        self.tx.send(line).map_err(|_| HandlerError::SendClosed)
    }

    /// Queue a chat message to `channel`.
    pub fn privmsg(&self, channel: &str, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(ClientLine::privmsg(channel, text))
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

//! Scripted in-memory transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Transport;
use crate::error::TransportError;

/// Transport that replays a fixed list of chunks and records what is sent.
///
/// Once the script is exhausted `receive` reports
/// [`TransportError::Closed`], which ends any read loop built on it.
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    sent: SentLog,
}

impl MemoryTransport {
    /// Create a transport that will hand out `chunks` in order.
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            inbound: chunks.into_iter().map(Into::into).collect(),
            sent: SentLog::default(),
        }
    }

    /// Handle onto everything written to this transport.
    ///
    /// The handle stays valid after the transport is moved or dropped.
    pub fn sent(&self) -> SentLog {
        self.sent.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.sent.push(data);
        Ok(())
    }

    async fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        self.inbound.pop_front().ok_or(TransportError::Closed)
    }
}

/// Shared record of bytes written to a [`MemoryTransport`].
#[derive(Debug, Clone, Default)]
pub struct SentLog {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SentLog {
    fn push(&self, data: &[u8]) {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(data);
    }

    /// Raw bytes sent so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Sent data split into CRLF-terminated lines, terminators removed.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.bytes())
            .split_terminator("\r\n")
            .map(str::to_owned)
            .collect()
    }
}

//! Byte-stream transports.
//!
//! The [`Transport`] trait is the only thing the rest of the stack needs
//! from a connection: send bytes, receive whatever chunk arrives next.
//!
//! - [`TcpTransport`]: plain TCP via tokio, used against the chat server
//! - [`MemoryTransport`]: scripted in-memory transport for tests and replays

mod memory;
mod tcp;

use async_trait::async_trait;

use crate::error::TransportError;

pub use memory::{MemoryTransport, SentLog};
pub use tcp::TcpTransport;

/// A connected byte stream.
///
/// `receive` may return partial lines or several lines at once; framing is
/// the job of [`LineBuffer`](crate::LineBuffer). End of stream is reported
/// as [`TransportError::Closed`], never as an empty chunk.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `data` to the peer.
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Wait for the next chunk of bytes from the peer.
    ///
    /// Must be cancel safe: a dropped call consumes nothing.
    async fn receive(&mut self) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send(data).await
    }

    async fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).receive().await
    }
}

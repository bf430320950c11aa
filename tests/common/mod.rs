//! Integration test common infrastructure.
//!
//! Provides a scripted bot (in-memory transport plus canned API responses)
//! and a fake chat server on a real TCP socket.

pub mod bot;
pub mod server;

#[allow(unused_imports)]
pub use bot::{TestBot, chat_line};
#[allow(unused_imports)]
pub use server::FakeChatServer;

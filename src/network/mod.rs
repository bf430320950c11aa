//! Connection plumbing between the bot and its transport.

mod connection;

pub use connection::Connection;

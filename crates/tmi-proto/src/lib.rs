//! # tmi-proto
//!
//! Protocol plumbing for Twitch-style IRC chat: byte transports, line
//! framing, chat-line parsing and outgoing line construction.
//!
//! Nothing in this crate knows about commands or bots. The `tmibot` crate
//! builds its dispatch loop on top of these pieces.
//!
//! ## Quick Start
//!
//! ### Parsing chat lines
//!
//! ```rust
//! use tmi_proto::{classify, Inbound};
//!
//! let raw = ":alice!alice@alice.tmi.twitch.tv PRIVMSG #bob :hello: world";
//! match classify(raw) {
//!     Inbound::Chat(chat) => {
//!         assert_eq!(chat.user, "alice");
//!         assert_eq!(chat.channel, "bob");
//!         assert_eq!(chat.content, "hello: world");
//!     }
//!     other => panic!("unexpected line: {:?}", other),
//! }
//! ```
//!
//! ### Building outgoing lines
//!
//! ```rust
//! use tmi_proto::ClientLine;
//!
//! let line = ClientLine::privmsg("bob", "5");
//! assert_eq!(line.to_string(), "PRIVMSG #bob :5");
//! assert_eq!(line.to_wire(), b"PRIVMSG #bob :5\r\n".to_vec());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chat;
pub mod client;
pub mod error;
pub mod line;
pub mod transport;

pub use self::chat::{classify, parse_chat_line, ChatLine, Inbound, PRIVMSG_MARKER};
pub use self::client::ClientLine;
pub use self::error::{ProtocolError, TransportError, TransportReadError};
pub use self::line::{LineBuffer, LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::transport::{MemoryTransport, SentLog, TcpTransport, Transport};

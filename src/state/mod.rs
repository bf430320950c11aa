//! Chat values, capability handles and the bot lifecycle.
//!
//! - [`message`]: immutable values parsed from chat ([`ChatMessage`],
//!   [`Identity`], [`ChannelRef`])
//! - [`handles`]: [`Channel`], [`User`] and [`Stream`], which carry the
//!   capabilities to reply and to query the API
//! - [`machine`]: the Disconnected -> Connected -> Joined -> Running lifecycle

mod handles;
mod machine;
mod message;

pub use handles::{Channel, ChannelInfo, Stream, User};
pub use machine::{BotState, Phase};
pub use message::{ChannelRef, ChatMessage, Identity};

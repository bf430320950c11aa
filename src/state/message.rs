//! Immutable chat values.

use std::fmt;
use tmi_proto::ChatLine;

/// A chat user, identified by login name alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A channel, identified by name alone (no leading `#`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelRef {
    name: String,
}

impl ChannelRef {
    /// A leading `#` is dropped so `"#bob"` and `"bob"` are the same channel.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = match name.strip_prefix('#') {
            Some(bare) => bare.to_string(),
            None => name,
        };
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One received chat message. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    author: Identity,
    channel: ChannelRef,
    content: String,
}

impl ChatMessage {
    pub fn new(author: Identity, channel: ChannelRef, content: impl Into<String>) -> Self {
        Self {
            author,
            channel,
            content: content.into(),
        }
    }

    pub fn author(&self) -> &Identity {
        &self.author
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl From<ChatLine<'_>> for ChatMessage {
    fn from(line: ChatLine<'_>) -> Self {
        Self::new(
            Identity::new(line.user),
            ChannelRef::new(line.channel),
            line.content,
        )
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} <{}> {}", self.channel, self.author, self.content)
    }
}

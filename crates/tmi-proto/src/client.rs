//! Outgoing protocol lines.

use std::fmt;

/// A line the bot sends to the chat server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLine {
    /// `PASS <password>`
    Pass(String),
    /// `NICK <username>`
    Nick(String),
    /// `JOIN #<channel>`
    Join(String),
    /// `PART #<channel>`
    Part(String),
    /// `PRIVMSG #<channel> :<text>`
    Privmsg {
        /// Target channel.
        channel: String,
        /// Message body.
        text: String,
    },
    /// `PONG :<token>`
    Pong(String),
}

impl ClientLine {
    /// Build a chat message line.
    pub fn privmsg(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Privmsg {
            channel: channel.into(),
            text: text.into(),
        }
    }

    /// Serialize with the CRLF terminator, ready for the wire.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut line = self.to_string();
        line.push_str("\r\n");
        line.into_bytes()
    }

    /// Whether the line carries a secret and must not be logged verbatim.
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

impl fmt::Display for ClientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(password) => write!(f, "PASS {}", single_line(password)),
            Self::Nick(nick) => write!(f, "NICK {}", single_line(nick)),
            Self::Join(channel) => write!(f, "JOIN #{}", channel_name(channel)),
            Self::Part(channel) => write!(f, "PART #{}", channel_name(channel)),
            Self::Privmsg { channel, text } => {
                write!(f, "PRIVMSG #{} :{}", channel_name(channel), single_line(text))
            }
            Self::Pong(token) => write!(f, "PONG :{}", single_line(token)),
        }
    }
}

/// Channel names are stored bare; accept a leading `#` anyway.
fn channel_name(channel: &str) -> String {
    single_line(channel.strip_prefix('#').unwrap_or(channel))
}

/// Replace line breaks so one value can never become two protocol lines.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_formats() {
        assert_eq!(ClientLine::Pass("oauth:abc".into()).to_string(), "PASS oauth:abc");
        assert_eq!(ClientLine::Nick("bot".into()).to_string(), "NICK bot");
        assert_eq!(ClientLine::Join("bob".into()).to_string(), "JOIN #bob");
        assert_eq!(ClientLine::Part("bob".into()).to_string(), "PART #bob");
        assert_eq!(ClientLine::privmsg("bob", "5").to_string(), "PRIVMSG #bob :5");
        assert_eq!(ClientLine::Pong("tmi.twitch.tv".into()).to_string(), "PONG :tmi.twitch.tv");
    }

    #[test]
    fn test_hash_prefix_not_doubled() {
        assert_eq!(ClientLine::Join("#bob".into()).to_string(), "JOIN #bob");
        assert_eq!(ClientLine::privmsg("#bob", "hi").to_string(), "PRIVMSG #bob :hi");
    }

    #[test]
    fn test_line_breaks_cannot_inject() {
        let line = ClientLine::privmsg("bob", "hi\r\nJOIN #evil");
        assert_eq!(line.to_wire(), b"PRIVMSG #bob :hi  JOIN #evil\r\n".to_vec());
    }

    #[test]
    fn test_pass_is_sensitive() {
        assert!(ClientLine::Pass("x".into()).is_sensitive());
        assert!(!ClientLine::Nick("x".into()).is_sensitive());
    }
}

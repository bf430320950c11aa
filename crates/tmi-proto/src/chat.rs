//! Inbound line classification and chat-line parsing.
//!
//! Chat lines arrive as
//!
//! ```text
//! :<user>!<user>@<user>.tmi.twitch.tv PRIVMSG #<channel> :<content>
//! ```
//!
//! Parsing is zero-copy: a [`ChatLine`] borrows from the raw line.

use tracing::debug;

/// Marker token identifying a chat message line.
pub const PRIVMSG_MARKER: &str = "PRIVMSG";

/// A decomposed chat message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLine<'a> {
    /// Login name of the author.
    pub user: &'a str,
    /// Channel name without the leading `#`.
    pub channel: &'a str,
    /// Message body, internal colons preserved.
    pub content: &'a str,
}

/// What a raw inbound line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Server keep-alive; carries the token to echo back in `PONG`.
    Ping(&'a str),
    /// A chat message.
    Chat(ChatLine<'a>),
    /// Anything else (numerics, JOIN acks, CAP replies, ...).
    Other(&'a str),
}

/// Classify one terminator-stripped line.
pub fn classify(line: &str) -> Inbound<'_> {
    if let Some(rest) = strip_tags(line).strip_prefix("PING") {
        let token = rest.trim_start();
        return Inbound::Ping(token.strip_prefix(':').unwrap_or(token));
    }

    match parse_chat_line(line) {
        Some(chat) => Inbound::Chat(chat),
        None => Inbound::Other(line),
    }
}

/// Decompose a chat line into author, channel and content.
///
/// Returns `None` for lines without the [`PRIVMSG_MARKER`], and for
/// candidate lines that are too malformed to yield all three fields.
pub fn parse_chat_line(line: &str) -> Option<ChatLine<'_>> {
    let line = strip_tags(line);
    if !line.contains(PRIVMSG_MARKER) {
        return None;
    }

    let parsed = decompose(line);
    if parsed.is_none() {
        debug!(line, "malformed chat line");
    }
    parsed
}

fn decompose(line: &str) -> Option<ChatLine<'_>> {
    // Drop the leading sigil
    let mut chars = line.chars();
    chars.next()?;
    let data = chars.as_str();

    let (user, _) = data.split_once('!')?;

    let (_, after_hash) = data.split_once('#')?;
    let (channel, _) = after_hash.split_once(':')?;
    let channel = channel.trim_end();

    // Everything after the first colon is content, even if it has colons
    let (_, content) = data.split_once(':')?;

    Some(ChatLine {
        user,
        channel,
        content,
    })
}

/// Skip a leading IRCv3 tag section (`@k=v;k2=v2 `).
fn strip_tags(line: &str) -> &str {
    if line.starts_with('@') {
        line.split_once(' ').map_or("", |(_, rest)| rest)
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_chat_line() {
        let chat = parse_chat_line(":alice!alice@alice.tmi.twitch.tv PRIVMSG #bob :!add 2 3")
            .expect("chat line");

        assert_eq!(chat.user, "alice");
        assert_eq!(chat.channel, "bob");
        assert_eq!(chat.content, "!add 2 3");
    }

    #[test]
    fn test_content_keeps_internal_colons() {
        let chat =
            parse_chat_line(":alice!alice@alice.tmi.twitch.tv PRIVMSG #bob :time: 12:30:00")
                .expect("chat line");

        assert_eq!(chat.content, "time: 12:30:00");
    }

    #[test]
    fn test_content_with_hash_and_bang() {
        let chat = parse_chat_line(":al!al@al.tmi.twitch.tv PRIVMSG #chan :see #other! now")
            .expect("chat line");

        assert_eq!(chat.user, "al");
        assert_eq!(chat.channel, "chan");
        assert_eq!(chat.content, "see #other! now");
    }

    #[test]
    fn test_empty_content() {
        let chat = parse_chat_line(":a!a@a.tmi.twitch.tv PRIVMSG #b :").expect("chat line");
        assert_eq!(chat.content, "");
    }

    #[test]
    fn test_tags_are_skipped() {
        let chat = parse_chat_line(
            "@badge-info=;color=#FF0000;display-name=Alice :alice!alice@alice.tmi.twitch.tv PRIVMSG #bob :hi",
        )
        .expect("chat line");

        assert_eq!(chat.user, "alice");
        assert_eq!(chat.channel, "bob");
        assert_eq!(chat.content, "hi");
    }

    #[test]
    fn test_non_chat_lines() {
        assert_eq!(parse_chat_line(":tmi.twitch.tv 001 bot :Welcome, GLHF!"), None);
        assert_eq!(parse_chat_line(":bot!bot@bot.tmi.twitch.tv JOIN #bob"), None);
        assert_eq!(parse_chat_line(""), None);
    }

    #[test]
    fn test_malformed_candidate_returns_none() {
        assert_eq!(parse_chat_line("PRIVMSG"), None);
        assert_eq!(parse_chat_line(":nobang PRIVMSG #chan :x"), None);
        assert_eq!(parse_chat_line(":a!a@a PRIVMSG nochannel :x"), None);
        assert_eq!(parse_chat_line(":a!a@a PRIVMSG #chan"), None);
    }

    #[test]
    fn test_classify_ping() {
        assert_eq!(classify("PING :tmi.twitch.tv"), Inbound::Ping("tmi.twitch.tv"));
        assert_eq!(classify("PING"), Inbound::Ping(""));
    }

    #[test]
    fn test_classify_chat_mentioning_ping() {
        let line = ":a!a@a.tmi.twitch.tv PRIVMSG #b :PING me";
        assert!(matches!(classify(line), Inbound::Chat(c) if c.content == "PING me"));
    }

    #[test]
    fn test_classify_other() {
        let line = ":tmi.twitch.tv CAP * ACK :twitch.tv/membership";
        assert_eq!(classify(line), Inbound::Other(line));
    }
}

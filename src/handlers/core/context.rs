//! Handler context and command arguments.
//!
//! Defines the [`Context`] passed to command handlers, the [`Dispatch`]
//! view passed to event handlers, and the [`Args`]/[`Invocation`] types
//! produced when a message is recognised as a command.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use super::middleware::ChatSender;
use super::registry::CommandRegistry;
use crate::api::RestClient;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{Channel, ChatMessage, Identity, User};

// ============================================================================
// Command invocation
// ============================================================================

/// Positional command arguments, exactly as typed after the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<String>);

impl Args {
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `index`, or [`HandlerError::MissingArgument`].
    pub fn get(&self, index: usize) -> Result<&str, HandlerError> {
        self.0
            .get(index)
            .map(String::as_str)
            .ok_or(HandlerError::MissingArgument { index })
    }

    /// Parse the argument at `index`.
    pub fn parse<T>(&self, index: usize) -> Result<T, HandlerError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.get(index)?;
        value.parse().map_err(|e: T::Err| HandlerError::InvalidArgument {
            index,
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    /// Require exactly `expected` arguments.
    pub fn expect_count(&self, expected: usize) -> Result<(), HandlerError> {
        if self.0.len() == expected {
            Ok(())
        } else {
            Err(HandlerError::ArgumentCount {
                expected,
                got: self.0.len(),
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Everything after the command name, re-joined with single spaces.
    pub fn rest(&self) -> String {
        self.0.join(" ")
    }
}

/// A message recognised as a command: the name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Args,
}

impl Invocation {
    /// Split `content` into a command name and arguments.
    ///
    /// Returns `None` unless `content` starts with `prefix` (compared byte
    /// for byte). The remainder is split on single spaces: the first token
    /// is the name, which may be empty, and the rest are arguments.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let body = content.strip_prefix(prefix)?;
        let mut tokens = body.split(' ');
        let name = tokens.next().unwrap_or_default().to_string();
        let args = Args::new(tokens.map(str::to_string).collect());
        Some(Self { name, args })
    }
}

// ============================================================================
// Contexts
// ============================================================================

/// Context passed to a command handler.
pub struct Context<'a> {
    message: &'a ChatMessage,
    sender: &'a ChatSender,
    api: &'a Arc<RestClient>,
}

impl<'a> Context<'a> {
    pub fn new(message: &'a ChatMessage, sender: &'a ChatSender, api: &'a Arc<RestClient>) -> Self {
        Self {
            message,
            sender,
            api,
        }
    }

    /// The message that triggered the command.
    pub fn message(&self) -> &ChatMessage {
        self.message
    }

    pub fn author(&self) -> &Identity {
        self.message.author()
    }

    /// The channel the message was sent in.
    pub fn channel(&self) -> Channel {
        Channel::new(
            self.message.channel().clone(),
            self.sender.clone(),
            self.api.clone(),
        )
    }

    /// The author, as a [`User`] seen from this channel.
    pub fn user(&self) -> User {
        self.create_user(self.author().name())
    }

    /// Any user, as seen from this channel.
    pub fn create_user(&self, name: &str) -> User {
        User::new(name, self.channel())
    }

    /// Reply in the channel the message came from.
    pub fn reply(&self, text: impl Into<String>) -> HandlerResult {
        self.sender.privmsg(self.message.channel().name(), text)
    }

    pub fn sender(&self) -> &ChatSender {
        self.sender
    }

    pub fn api(&self) -> &Arc<RestClient> {
        self.api
    }
}

/// What event handlers can reach: command processing and the bot's
/// capabilities, but not the connection itself.
pub struct Dispatch<'a> {
    registry: &'a CommandRegistry,
    prefix: &'a str,
    sender: &'a ChatSender,
    api: &'a Arc<RestClient>,
}

impl<'a> Dispatch<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        prefix: &'a str,
        sender: &'a ChatSender,
        api: &'a Arc<RestClient>,
    ) -> Self {
        Self {
            registry,
            prefix,
            sender,
            api,
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix
    }

    pub fn sender(&self) -> &ChatSender {
        self.sender
    }

    pub fn api(&self) -> &Arc<RestClient> {
        self.api
    }

    /// Build a command context for `message`.
    pub fn context<'m>(&'m self, message: &'m ChatMessage) -> Context<'m> {
        Context::new(message, self.sender, self.api)
    }

    /// Run `message` as a command if it starts with the prefix.
    ///
    /// Messages without the prefix are ignored. An unknown or empty command
    /// name is [`HandlerError::CommandNotFound`].
    pub async fn process_commands(&self, message: &ChatMessage) -> HandlerResult {
        let Some(invocation) = Invocation::parse(message.content(), self.prefix) else {
            return Ok(());
        };
        let ctx = self.context(message);
        self.registry.dispatch(invocation, &ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::new(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_invocation_parse() {
        let inv = Invocation::parse("!add 2 3", "!").unwrap();
        assert_eq!(inv.name, "add");
        assert_eq!(inv.args, args(&["2", "3"]));

        assert!(Invocation::parse("add 2 3", "!").is_none());
        assert!(Invocation::parse("", "!").is_none());
    }

    #[test]
    fn test_invocation_prefix_is_literal() {
        assert!(Invocation::parse("!!hi", "!!").is_some());
        assert!(Invocation::parse("!hi", "!!").is_none());
        assert!(Invocation::parse(".*hi", ".*").is_some());
        assert!(Invocation::parse("xhi", ".*").is_none());
    }

    #[test]
    fn test_invocation_empty_name() {
        assert_eq!(Invocation::parse("!", "!").unwrap().name, "");
        let inv = Invocation::parse("! add", "!").unwrap();
        assert_eq!(inv.name, "");
        assert_eq!(inv.args, args(&["add"]));
    }

    #[test]
    fn test_invocation_keeps_empty_tokens() {
        let inv = Invocation::parse("!say a  b", "!").unwrap();
        assert_eq!(inv.args, args(&["a", "", "b"]));
    }

    #[test]
    fn test_args_accessors() {
        let a = args(&["2", "x"]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(1).unwrap(), "x");
        assert_eq!(a.parse::<i64>(0).unwrap(), 2);
        assert_eq!(a.rest(), "2 x");

        assert!(matches!(a.get(2), Err(HandlerError::MissingArgument { index: 2 })));
        assert!(matches!(
            a.parse::<i64>(1),
            Err(HandlerError::InvalidArgument { index: 1, .. })
        ));
        assert!(a.expect_count(2).is_ok());
        assert!(matches!(
            a.expect_count(3),
            Err(HandlerError::ArgumentCount { expected: 3, got: 2 })
        ));
    }
}

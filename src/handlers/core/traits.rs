//! Handler traits.
//!
//! - [`CommandHandler`]: a named chat command
//! - [`MessageHandler`]: the "message received" event slot
//! - [`ErrorHandler`]: the "processing failed" event slot
//! - [`Cog`]: a bundle of registrations applied to a bot in one go
//!
//! Each trait has a closure adapter (`command_fn`, `message_fn`, `error_fn`)
//! for synchronous handlers. Handlers that call the API implement the trait
//! directly so they can `.await`.

use async_trait::async_trait;

use super::context::{Args, Context, Dispatch};
use crate::bot::Bot;
use crate::error::{BotError, HandlerError, HandlerResult};
use crate::state::ChatMessage;

// ============================================================================
// Commands
// ============================================================================

/// A chat command.
///
/// The registry does not check arity; handlers validate their own
/// arguments (see [`Args::expect_count`]).
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn call(&self, ctx: &Context<'_>, args: Args) -> HandlerResult;
}

/// [`CommandHandler`] wrapping a synchronous closure.
pub struct FnCommand<F>(F);

#[async_trait]
impl<F> CommandHandler for FnCommand<F>
where
    F: Fn(&Context<'_>, Args) -> HandlerResult + Send + Sync,
{
    async fn call(&self, ctx: &Context<'_>, args: Args) -> HandlerResult {
        (self.0)(ctx, args)
    }
}

/// Adapt a closure into a [`CommandHandler`].
pub fn command_fn<F>(f: F) -> FnCommand<F>
where
    F: Fn(&Context<'_>, Args) -> HandlerResult + Send + Sync + 'static,
{
    FnCommand(f)
}

// ============================================================================
// Events
// ============================================================================

/// Handler for every received chat message.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, bot: &Dispatch<'_>, message: &ChatMessage) -> HandlerResult;
}

/// Handler for failures raised while processing a message.
///
/// An error returned from here is not caught again: it stops the bot.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn on_error(
        &self,
        bot: &Dispatch<'_>,
        message: &ChatMessage,
        error: HandlerError,
    ) -> HandlerResult;
}

/// [`MessageHandler`] wrapping a synchronous closure.
pub struct FnMessage<F>(F);

#[async_trait]
impl<F> MessageHandler for FnMessage<F>
where
    F: Fn(&Dispatch<'_>, &ChatMessage) -> HandlerResult + Send + Sync,
{
    async fn on_message(&self, bot: &Dispatch<'_>, message: &ChatMessage) -> HandlerResult {
        (self.0)(bot, message)
    }
}

pub fn message_fn<F>(f: F) -> FnMessage<F>
where
    F: Fn(&Dispatch<'_>, &ChatMessage) -> HandlerResult + Send + Sync + 'static,
{
    FnMessage(f)
}

/// [`ErrorHandler`] wrapping a synchronous closure.
pub struct FnError<F>(F);

#[async_trait]
impl<F> ErrorHandler for FnError<F>
where
    F: Fn(&Dispatch<'_>, &ChatMessage, HandlerError) -> HandlerResult + Send + Sync,
{
    async fn on_error(
        &self,
        bot: &Dispatch<'_>,
        message: &ChatMessage,
        error: HandlerError,
    ) -> HandlerResult {
        (self.0)(bot, message, error)
    }
}

pub fn error_fn<F>(f: F) -> FnError<F>
where
    F: Fn(&Dispatch<'_>, &ChatMessage, HandlerError) -> HandlerResult + Send + Sync + 'static,
{
    FnError(f)
}

// ============================================================================
// Cogs
// ============================================================================

/// A reusable set of commands and event handlers.
///
/// ```ignore
/// struct Greetings;
///
/// impl Cog for Greetings {
///     fn name(&self) -> &str {
///         "greetings"
///     }
///
///     fn setup(&self, bot: &mut Bot) -> Result<(), BotError> {
///         bot.command("hi", command_fn(|ctx, _| ctx.reply("hello!")), &[]);
///         Ok(())
///     }
/// }
/// ```
pub trait Cog {
    fn name(&self) -> &str;

    /// Register everything this cog provides.
    fn setup(&self, bot: &mut Bot) -> Result<(), BotError>;
}

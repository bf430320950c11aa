//! Command and event handling.
//!
//! A received [`ChatMessage`](crate::state::ChatMessage) goes to the
//! `"message"` event handler. By default that checks for the command
//! prefix and dispatches through the [`CommandRegistry`]. Anything that
//! fails is handed to the `"error"` event handler.

pub mod core;
pub mod events;

pub use self::core::{
    Args, ChatSender, CommandHandler, CommandRegistry, Cog, Context, Dispatch, ErrorHandler,
    FnCommand, FnError, FnMessage, Invocation, MessageHandler, command_fn, error_fn, message_fn,
};
pub use events::{
    ERROR_EVENT, EVENTS, EventDispatcher, EventHandler, LogError, MESSAGE_EVENT, ProcessCommands,
};

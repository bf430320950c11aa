//! Core handler infrastructure.
//!
//! - [`context`]: [`Context`] for commands, [`Dispatch`] for events, and
//!   the [`Args`]/[`Invocation`] split of a command message
//! - [`middleware`]: [`ChatSender`], the outbound reply queue
//! - [`registry`]: [`CommandRegistry`], name and alias lookup
//! - [`traits`]: the handler traits and closure adapters

pub mod context;
pub mod middleware;
pub mod registry;
pub mod traits;

pub use context::{Args, Context, Dispatch, Invocation};
pub use middleware::ChatSender;
pub use registry::CommandRegistry;
pub use traits::{
    CommandHandler, Cog, ErrorHandler, FnCommand, FnError, FnMessage, MessageHandler, command_fn,
    error_fn, message_fn,
};

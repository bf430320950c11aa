//! Event slots.
//!
//! The bot has two fixed extension points, `"message"` and `"error"`. Each
//! holds one handler and starts out with a default: process the message as
//! a command, and log the failure then carry on.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::core::context::Dispatch;
use super::core::traits::{ErrorHandler, MessageHandler};
use crate::error::{BotError, HandlerError, HandlerResult};
use crate::state::ChatMessage;

/// Name of the "message received" event.
pub const MESSAGE_EVENT: &str = "message";
/// Name of the "processing failed" event.
pub const ERROR_EVENT: &str = "error";

/// Every event name [`EventDispatcher::set_handler`] accepts.
pub const EVENTS: &[&str] = &[MESSAGE_EVENT, ERROR_EVENT];

/// A handler for one of the event slots.
#[derive(Clone)]
pub enum EventHandler {
    Message(Arc<dyn MessageHandler>),
    Error(Arc<dyn ErrorHandler>),
}

impl EventHandler {
    pub fn message(handler: impl MessageHandler + 'static) -> Self {
        Self::Message(Arc::new(handler))
    }

    pub fn error(handler: impl ErrorHandler + 'static) -> Self {
        Self::Error(Arc::new(handler))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => MESSAGE_EVENT,
            Self::Error(_) => ERROR_EVENT,
        }
    }
}

/// Default message handler: run the message as a command.
pub struct ProcessCommands;

#[async_trait]
impl MessageHandler for ProcessCommands {
    async fn on_message(&self, bot: &Dispatch<'_>, message: &ChatMessage) -> HandlerResult {
        bot.process_commands(message).await
    }
}

/// Default error handler: log and continue.
pub struct LogError;

#[async_trait]
impl ErrorHandler for LogError {
    async fn on_error(
        &self,
        _bot: &Dispatch<'_>,
        message: &ChatMessage,
        err: HandlerError,
    ) -> HandlerResult {
        error!(
            code = err.error_code(),
            author = %message.author(),
            channel = %message.channel(),
            content = message.content(),
            error = %err,
            "error while processing message"
        );
        Ok(())
    }
}

/// The two event slots.
pub struct EventDispatcher {
    message: Arc<dyn MessageHandler>,
    error: Arc<dyn ErrorHandler>,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self {
            message: Arc::new(ProcessCommands),
            error: Arc::new(LogError),
        }
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler of the named event.
    ///
    /// Fails immediately with [`BotError::UnknownEvent`] for a name outside
    /// [`EVENTS`], or [`BotError::EventMismatch`] when the handler is for a
    /// different slot.
    pub fn set_handler(&mut self, event: &str, handler: EventHandler) -> Result<(), BotError> {
        let slot = match event {
            MESSAGE_EVENT => MESSAGE_EVENT,
            ERROR_EVENT => ERROR_EVENT,
            other => return Err(BotError::UnknownEvent(other.to_string())),
        };

        match handler {
            EventHandler::Message(h) if slot == MESSAGE_EVENT => self.message = h,
            EventHandler::Error(h) if slot == ERROR_EVENT => self.error = h,
            handler => {
                debug!(event = slot, got = handler.kind(), "event handler rejected");
                return Err(BotError::EventMismatch {
                    event: slot,
                    got: handler.kind(),
                });
            }
        }

        debug!(event = slot, "event handler replaced");
        Ok(())
    }

    pub fn set_message_handler(&mut self, handler: Arc<dyn MessageHandler>) {
        self.message = handler;
    }

    pub fn set_error_handler(&mut self, handler: Arc<dyn ErrorHandler>) {
        self.error = handler;
    }

    /// Deliver one message.
    ///
    /// The message handler runs first; if it fails, the error handler gets
    /// the message and the error. A failing error handler is returned as
    /// [`BotError::ErrorHandler`].
    pub async fn dispatch(
        &self,
        bot: &Dispatch<'_>,
        message: &ChatMessage,
    ) -> Result<(), BotError> {
        let Err(err) = self.message.on_message(bot, message).await else {
            return Ok(());
        };

        debug!(code = err.error_code(), "message handler failed, invoking error handler");
        self.error
            .on_error(bot, message, err)
            .await
            .map_err(BotError::ErrorHandler)
    }
}

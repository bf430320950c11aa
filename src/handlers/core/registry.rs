//! Command registry and dispatch.
//!
//! Maps every command name and alias to a shared handler. Several keys may
//! point at the same handler; registering a key again replaces it.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, Level, debug, span};

use super::context::{Context, Invocation};
use super::traits::CommandHandler;
use crate::error::{HandlerError, HandlerResult};

/// Registry of chat commands.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name` and every alias.
    ///
    /// Existing keys are overwritten. Aliases of an earlier registration
    /// that are not listed again keep their old handler. Returns the shared
    /// handler stored under all the keys.
    pub fn register(
        &mut self,
        name: &str,
        handler: Arc<dyn CommandHandler>,
        aliases: &[&str],
    ) -> Arc<dyn CommandHandler> {
        for key in std::iter::once(name).chain(aliases.iter().copied()) {
            if self.handlers.insert(key.to_string(), handler.clone()).is_some() {
                debug!(command = key, "replaced command handler");
            }
        }
        handler
    }

    /// Look up a command by exact, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn CommandHandler>, HandlerError> {
        self.handlers
            .get(name)
            .ok_or_else(|| HandlerError::CommandNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names and aliases, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve `invocation` and run its handler.
    pub async fn dispatch(&self, invocation: Invocation, ctx: &Context<'_>) -> HandlerResult {
        let handler = self.resolve(&invocation.name)?;

        let command_span = span!(
            Level::DEBUG,
            "chat.command",
            command = %invocation.name,
            author = %ctx.author(),
            channel = %ctx.message().channel(),
            args = invocation.args.len(),
        );

        let result = handler
            .call(ctx, invocation.args)
            .instrument(command_span)
            .await;

        if let Err(ref e) = result {
            debug!(command = %invocation.name, code = e.error_code(), error = %e, "command failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::core::traits::command_fn;

    fn noop() -> Arc<dyn CommandHandler> {
        Arc::new(command_fn(|_, _| Ok(())))
    }

    #[test]
    fn test_name_and_aliases_share_handler() {
        let mut registry = CommandRegistry::new();
        let handler = registry.register("hello", noop(), &["hi", "hey"]);

        for key in ["hello", "hi", "hey"] {
            assert!(Arc::ptr_eq(registry.resolve(key).unwrap(), &handler));
        }
        assert_eq!(registry.names(), vec!["hello", "hey", "hi"]);
    }

    #[test]
    fn test_reregister_without_aliases_keeps_old_aliases() {
        let mut registry = CommandRegistry::new();
        let first = registry.register("hello", noop(), &["hi"]);
        let second = registry.register("hello", noop(), &[]);

        assert!(Arc::ptr_eq(registry.resolve("hello").unwrap(), &second));
        assert!(Arc::ptr_eq(registry.resolve("hi").unwrap(), &first));
    }

    #[test]
    fn test_reregister_with_aliases_replaces_them() {
        let mut registry = CommandRegistry::new();
        registry.register("hello", noop(), &["hi"]);
        let second = registry.register("hello", noop(), &["hi"]);

        assert!(Arc::ptr_eq(registry.resolve("hello").unwrap(), &second));
        assert!(Arc::ptr_eq(registry.resolve("hi").unwrap(), &second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_is_exact() {
        let mut registry = CommandRegistry::new();
        registry.register("hello", noop(), &[]);

        for missing in ["Hello", "hell", "hello ", ""] {
            assert!(matches!(
                registry.resolve(missing),
                Err(HandlerError::CommandNotFound(ref n)) if n == missing
            ));
        }
    }
}

//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::CommandHandler;
use super::invocation::Invocation;

/// Registry mapping command names to handlers
///
/// Multiple command names can map to the same handler if they share logic.
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry holding every built-in handler
    pub fn with_all_handlers() -> Self {
        let mut registry = Self::new();
        for handler in super::handlers::create_all_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register a handler for all names returned by `command_names()`
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names, not unique handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run one command and return the text to print. Failures become plain
    /// messages; nothing here ends the session.
    pub async fn dispatch(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> String {
        let Some(handler) = self.get(&invocation.name) else {
            return format!(
                "❓ Unknown command `{}`. Type `help` to see what I can do.",
                invocation.name
            );
        };

        debug!("Dispatching `{}` ({})", invocation.name, invocation.args);
        match handler.handle(ctx, invocation).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Command `{}` failed: {e}", invocation.name);
                format!("❌ {e}")
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::context;
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl CommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(&self, _ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
            if invocation.args == "boom" {
                bail!("it broke");
            }
            Ok(format!("ran {}", invocation.name))
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["treatments", "treatment"],
        }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("treatments"));
        assert!(registry.contains("treatment"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_all_handlers_cover_help_text() {
        let registry = CommandRegistry::with_all_handlers();
        for name in [
            "help", "permission", "allow", "deny", "treatments", "treatment", "remind",
            "reminders", "cancel", "appointments", "appointment", "log", "logs",
        ] {
            assert!(registry.contains(name), "missing handler for {name}");
        }
    }

    #[tokio::test]
    async fn test_dispatch_reports_failures_as_messages() {
        let (ctx, _) = context();
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler { names: &["echo"] }));

        let ok = Invocation::parse("echo").unwrap();
        assert_eq!(registry.dispatch(ctx.clone(), &ok).await, "ran echo");

        let failing = Invocation::parse("echo boom").unwrap();
        assert_eq!(registry.dispatch(ctx.clone(), &failing).await, "❌ it broke");

        let unknown = Invocation::parse("dance").unwrap();
        assert!(registry.dispatch(ctx, &unknown).await.contains("Unknown command"));
    }
}

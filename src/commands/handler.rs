//! Command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::CommandContext;
use super::invocation::Invocation;

/// Trait for terminal command handlers
///
/// Each handler processes one or more commands and returns the text to print.
/// Handlers are registered with a CommandRegistry and dispatched by command name.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl CommandHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle(&self, _ctx: Arc<CommandContext>, _invocation: &Invocation) -> Result<String> {
///         Ok("pong".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Handle the command. An `Err` is shown to the user as a failure message.
    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn CommandHandler) {}
}

//! # Command System
//!
//! Line-oriented terminal commands for the journal and its reminders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Handler trait, context and registry for terminal commands

pub mod context;
pub mod handler;
pub mod handlers;
pub mod invocation;
pub mod registry;

pub use context::CommandContext;
pub use handler::CommandHandler;
pub use invocation::Invocation;
pub use registry::CommandRegistry;

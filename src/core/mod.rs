//! # Core Module
//!
//! Configuration, time source and text helpers shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod config;
pub mod text;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use text::{format_duration, local_millis, parse_due, parse_duration, truncate_chars};

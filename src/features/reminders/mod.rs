//! # Reminders Feature
//!
//! Persisted reminder scheduling that survives restarts: consent gating,
//! a durable registry, one live timer per reminder, and a startup
//! reconciliation pass for reminders that matured while we were not running.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 2.0.0: In-process timers per reminder with startup reconciliation
//! - 1.0.0: Initial release

pub mod host;
pub mod permission;
pub mod reconcile;
pub mod registry;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use host::TerminalHost;
pub use permission::{NotificationHost, PermissionGate, PermissionState};
pub use reconcile::{MissedReminderPolicy, ReconcileReport, ReconciliationPass};
pub use registry::{Reminder, ReminderRegistry, REGISTRY_KEY};
pub use scheduler::{ScheduleError, TimerScheduler};

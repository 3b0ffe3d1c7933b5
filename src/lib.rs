// Core layer - configuration, clock and text helpers
pub mod core;

// Storage layer - durable key-value store
pub mod store;

// Features layer - reminders and the journal built on them
pub mod features;

// Application layer
pub mod commands;

pub use core::Config;
pub use store::PersistentStore;

pub use features::{
    // Journal
    AppointmentBook, DailyLogBook, TreatmentLog,
    // Reminders
    MissedReminderPolicy, NotificationHost, PermissionGate, PermissionState, ReconciliationPass,
    Reminder, ReminderRegistry, ScheduleError, TerminalHost, TimerScheduler,
};

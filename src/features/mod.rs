//! # Features
//!
//! - **reminders**: consent-gated reminders that survive restarts
//! - **journal**: treatments, appointments and daily symptom logs
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod journal;
pub mod reminders;

pub use journal::{
    Appointment, AppointmentBook, DailyLog, DailyLogBook, NewAppointment, ReminderOutcome,
    SymptomLog, Treatment, TreatmentLog,
};
pub use reminders::{
    MissedReminderPolicy, NotificationHost, PermissionGate, PermissionState, ReconcileReport,
    ReconciliationPass, Reminder, ReminderRegistry, ScheduleError, TerminalHost, TimerScheduler,
};

//! # Journal Feature
//!
//! Treatments, appointments and daily symptom entries, each stored as one
//! list under its own key. Treatments and appointments own reminders:
//! deleting one cancels its reminder.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod appointments;
pub mod daily_logs;
pub mod treatments;

pub use appointments::{Appointment, AppointmentBook, NewAppointment, ReminderOutcome};
pub use daily_logs::{DailyLog, DailyLogBook, SymptomLog};
pub use treatments::{Treatment, TreatmentLog};

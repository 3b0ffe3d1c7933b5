//! Medical appointments with optional lead-time reminders
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveTime};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::text::{local_millis, truncate_chars};
use crate::features::reminders::{Reminder, ScheduleError, TimerScheduler};
use crate::store::PersistentStore;

pub const APPOINTMENTS_KEY: &str = "appointments";
const REMINDER_NOTES_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub specialist: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM, empty when not given
    pub time: String,
    pub notes: String,
    #[serde(default)]
    pub reminder_set: bool,
}

/// Input for a new appointment
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub specialist: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub notes: String,
    pub remind: bool,
}

/// What happened to the reminder requested with an appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    NotRequested,
    Set { due_at: i64 },
    /// A reminder needs the appointment time
    MissingTime,
    Failed(ScheduleError),
}

#[derive(Clone)]
pub struct AppointmentBook {
    store: PersistentStore,
    scheduler: TimerScheduler,
    reminder_offset_ms: i64,
}

impl AppointmentBook {
    pub fn new(store: PersistentStore, scheduler: TimerScheduler, reminder_offset_ms: i64) -> Self {
        Self {
            store,
            scheduler,
            reminder_offset_ms,
        }
    }

    /// Sorted by date, then time
    pub fn list(&self) -> Vec<Appointment> {
        self.store.read(APPOINTMENTS_KEY, Vec::new())
    }

    /// Store the appointment. It is kept even when its reminder cannot be set.
    pub fn add(&self, new: NewAppointment) -> Result<(Appointment, ReminderOutcome)> {
        let specialist = new.specialist.trim();
        if specialist.is_empty() {
            bail!("An appointment needs a specialist");
        }

        let mut appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            specialist: specialist.to_string(),
            date: new.date.format("%Y-%m-%d").to_string(),
            time: new
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            notes: new.notes.trim().to_string(),
            reminder_set: false,
        };

        let outcome = match (new.remind, new.time) {
            (false, _) => ReminderOutcome::NotRequested,
            (true, None) => ReminderOutcome::MissingTime,
            (true, Some(time)) => {
                let starts_at = local_millis(new.date, time).ok_or_else(|| {
                    anyhow!("{} {} does not exist in the local timezone", appointment.date, appointment.time)
                })?;
                let reminder = Reminder::new(
                    appointment.id.clone(),
                    format!("Recordatorio de Cita: {}", appointment.specialist),
                    format!(
                        "Tu cita es a las {}. {}",
                        appointment.time,
                        truncate_chars(&appointment.notes, REMINDER_NOTES_LIMIT)
                    ),
                    starts_at.saturating_sub(self.reminder_offset_ms),
                );
                let due_at = reminder.due_at;
                match self.scheduler.arm(reminder) {
                    Ok(()) => ReminderOutcome::Set { due_at },
                    Err(e) => ReminderOutcome::Failed(e),
                }
            }
        };
        appointment.reminder_set = matches!(outcome, ReminderOutcome::Set { .. });

        let mut appointments = self.list();
        appointments.push(appointment.clone());
        appointments.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
        self.store.write(APPOINTMENTS_KEY, &appointments);

        info!(
            "Added appointment {} with {} on {} (reminder: {:?})",
            appointment.id, appointment.specialist, appointment.date, outcome
        );
        Ok((appointment, outcome))
    }

    /// Delete an appointment and cancel its reminder. Returns false if unknown.
    pub fn remove(&self, id: &str) -> bool {
        let mut appointments = self.list();
        let before = appointments.len();
        appointments.retain(|a| a.id != id);
        let removed = appointments.len() != before;

        if removed {
            self.store.write(APPOINTMENTS_KEY, &appointments);
            info!("Removed appointment {id}");
        }
        self.scheduler.cancel(id);
        removed
    }
}

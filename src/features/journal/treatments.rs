//! Treatment log
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::reminders::{Reminder, TimerScheduler};
use crate::store::PersistentStore;

pub const TREATMENTS_KEY: &str = "treatments";
pub const TREATMENT_REMINDER_TITLE: &str = "Recordatorio de Tratamiento";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: String,
    pub name: String,
    pub notes: String,
    /// Display date (dd/mm/yyyy) of when it was added
    pub date_added: String,
}

impl Treatment {
    pub fn reminder_body(&self) -> String {
        format!("Es hora de tu tratamiento: {}. {}", self.name, self.notes)
    }
}

#[derive(Clone)]
pub struct TreatmentLog {
    store: PersistentStore,
    scheduler: TimerScheduler,
}

impl TreatmentLog {
    pub fn new(store: PersistentStore, scheduler: TimerScheduler) -> Self {
        Self { store, scheduler }
    }

    /// Newest first
    pub fn list(&self) -> Vec<Treatment> {
        self.store.read(TREATMENTS_KEY, Vec::new())
    }

    pub fn get(&self, id: &str) -> Option<Treatment> {
        self.list().into_iter().find(|t| t.id == id)
    }

    pub fn add(&self, name: &str, notes: &str) -> Result<Treatment> {
        let name = name.trim();
        if name.is_empty() {
            bail!("A treatment needs a name");
        }

        let treatment = Treatment {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            notes: notes.trim().to_string(),
            date_added: Local::now().format("%d/%m/%Y").to_string(),
        };

        let mut treatments = self.list();
        treatments.insert(0, treatment.clone());
        self.store.write(TREATMENTS_KEY, &treatments);

        info!("Added treatment {} ({})", treatment.id, treatment.name);
        Ok(treatment)
    }

    /// Delete a treatment and cancel its reminder. Returns false if unknown.
    pub fn remove(&self, id: &str) -> bool {
        let mut treatments = self.list();
        let before = treatments.len();
        treatments.retain(|t| t.id != id);
        let removed = treatments.len() != before;

        if removed {
            self.store.write(TREATMENTS_KEY, &treatments);
            info!("Removed treatment {id}");
        }
        self.scheduler.cancel(id);
        removed
    }

    /// Arm a reminder for the treatment at `due_at` (epoch ms)
    pub fn set_reminder(&self, id: &str, due_at: i64) -> Result<Reminder> {
        let treatment = self
            .get(id)
            .ok_or_else(|| anyhow!("No treatment with id {id}"))?;

        let reminder = Reminder::new(
            treatment.id.clone(),
            TREATMENT_REMINDER_TITLE,
            treatment.reminder_body(),
            due_at,
        );
        self.scheduler.arm(reminder.clone())?;
        Ok(reminder)
    }
}

//! # Reconciliation Pass
//!
//! Runs once per process start, before any caller can schedule. Reminders still
//! in the future get their timers back; reminders that matured while the process
//! was not running are removed. By default they are removed silently; the
//! `Announce` policy shows one summary alert for them first.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::registry::Reminder;
use super::scheduler::TimerScheduler;

pub const MISSED_SUMMARY_TITLE: &str = "Recordatorios perdidos";

/// What to do with reminders that came due while the process was down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissedReminderPolicy {
    /// Remove without alerting
    #[default]
    Discard,
    /// Remove, showing a single summary alert
    Announce,
}

impl std::fmt::Display for MissedReminderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissedReminderPolicy::Discard => write!(f, "discard"),
            MissedReminderPolicy::Announce => write!(f, "announce"),
        }
    }
}

impl std::str::FromStr for MissedReminderPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "discard" => Ok(MissedReminderPolicy::Discard),
            "announce" => Ok(MissedReminderPolicy::Announce),
            _ => Err(anyhow::anyhow!("Invalid missed reminder policy: {}", s)),
        }
    }
}

/// Outcome of a reconciliation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Permission was not granted, nothing was touched
    pub skipped: bool,
    pub rearmed: Vec<String>,
    pub discarded: Vec<String>,
    pub malformed: usize,
}

pub struct ReconciliationPass {
    scheduler: TimerScheduler,
    policy: MissedReminderPolicy,
}

impl ReconciliationPass {
    pub fn new(scheduler: TimerScheduler, policy: MissedReminderPolicy) -> Self {
        Self { scheduler, policy }
    }

    /// Restore timer state from the registry. Never fails; anything that
    /// cannot be understood is dropped.
    pub async fn run(self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let permission = self.scheduler.gate().current();
        if !self.scheduler.gate().is_granted() {
            info!("Skipping reminder reconciliation: notification permission is {permission}");
            report.skipped = true;
            return report;
        }

        let registry = self.scheduler.registry();
        report.malformed = registry.prune_malformed();

        let now = self.scheduler.now_millis();
        let mut seen = HashSet::new();
        let mut missed: Vec<Reminder> = Vec::new();

        for reminder in registry.all() {
            if !seen.insert(reminder.id.clone()) {
                continue;
            }

            if reminder.due_at > now {
                report.rearmed.push(reminder.id.clone());
                self.scheduler.arm_at(reminder, now);
            } else {
                registry.remove(&reminder.id);
                report.discarded.push(reminder.id.clone());
                missed.push(reminder);
            }
        }

        if !missed.is_empty() {
            match self.policy {
                MissedReminderPolicy::Discard => {
                    info!(
                        "Discarded {} reminder(s) that came due while not running",
                        missed.len()
                    );
                }
                MissedReminderPolicy::Announce => self.announce(&missed).await,
            }
        }

        info!(
            "Reminder reconciliation done: {} re-armed, {} discarded, {} malformed",
            report.rearmed.len(),
            report.discarded.len(),
            report.malformed
        );
        report
    }

    async fn announce(&self, missed: &[Reminder]) {
        let titles: Vec<&str> = missed.iter().map(|r| r.title.as_str()).collect();
        let body = format!(
            "Mientras la aplicación estaba cerrada venció: {}",
            titles.join(", ")
        );
        if let Err(e) = self
            .scheduler
            .gate()
            .host()
            .show(MISSED_SUMMARY_TITLE, &body)
            .await
        {
            warn!("Failed to announce missed reminders: {e}");
        }
    }
}

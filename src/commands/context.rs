//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{Clock, Config};
use crate::features::journal::{AppointmentBook, DailyLogBook, TreatmentLog};
use crate::features::reminders::{
    MissedReminderPolicy, PermissionGate, ReconcileReport, ReconciliationPass, ReminderRegistry,
    TerminalHost, TimerScheduler,
};
use crate::store::PersistentStore;

/// Shared state for all command handlers
pub struct CommandContext {
    pub store: PersistentStore,
    pub host: Arc<TerminalHost>,
    pub scheduler: TimerScheduler,
    pub treatments: TreatmentLog,
    pub appointments: AppointmentBook,
    pub daily_logs: DailyLogBook,
    missed_reminders: MissedReminderPolicy,
    reconciled: AtomicBool,
}

impl CommandContext {
    pub fn new(
        store: PersistentStore,
        host: Arc<TerminalHost>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        let gate = PermissionGate::new(host.clone());
        let scheduler = TimerScheduler::new(gate, ReminderRegistry::new(store.clone()), clock);

        Self {
            treatments: TreatmentLog::new(store.clone(), scheduler.clone()),
            appointments: AppointmentBook::new(
                store.clone(),
                scheduler.clone(),
                config.appointment_reminder_offset_ms,
            ),
            daily_logs: DailyLogBook::new(store.clone()),
            store,
            host,
            scheduler,
            missed_reminders: config.missed_reminders,
            reconciled: AtomicBool::new(false),
        }
    }

    /// Run the reconciliation pass. A pass skipped for lack of consent is
    /// retried by `reconcile_if_pending` once consent arrives.
    pub async fn reconcile(&self) -> ReconcileReport {
        let report = ReconciliationPass::new(self.scheduler.clone(), self.missed_reminders)
            .run()
            .await;
        if !report.skipped {
            self.reconciled.store(true, Ordering::SeqCst);
        }
        report
    }

    /// Reconcile unless a pass already completed this session
    pub async fn reconcile_if_pending(&self) -> Option<ReconcileReport> {
        if self.reconciled.load(Ordering::SeqCst) {
            return None;
        }
        info!("Running deferred reminder reconciliation");
        Some(self.reconcile().await)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use crate::features::reminders::{PermissionState, Reminder, ReminderRegistry};
    use crate::store::PersistentStore;

    #[tokio::test]
    async fn test_deferred_reconciliation_runs_once() {
        let store = PersistentStore::in_memory();
        ReminderRegistry::new(store.clone()).upsert(Reminder::new("a", "t", "b", NOW + 60_000));

        let (ctx, _) = context_with(store, PermissionState::Default);
        assert!(ctx.reconcile().await.skipped);
        assert!(!ctx.scheduler.is_armed("a"));

        ctx.host.answer(PermissionState::Granted);
        let report = ctx.reconcile_if_pending().await.unwrap();
        assert_eq!(report.rearmed, vec!["a".to_string()]);
        assert!(ctx.scheduler.is_armed("a"));

        assert!(ctx.reconcile_if_pending().await.is_none());
    }
}

//! # Timer Scheduler
//!
//! Owns the table of live timers, at most one per reminder id. Each timer is a
//! tokio task sleeping until the reminder is due. A timer only fires if it is
//! still the live entry for its id when it wakes, so a cancel or re-arm that
//! wins the table lock first guarantees the superseded timer never fires.
//!
//! Firing shows the alert, then removes the registry entry. A crash between
//! the two leaves a past-due entry behind, which the next reconciliation pass
//! discards without showing it again.
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use super::permission::{PermissionGate, PermissionState};
use super::registry::{Reminder, ReminderRegistry};
use crate::core::Clock;

/// Why a reminder could not be armed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("notifications are not allowed (permission is {0}); allow them and try again")]
    PermissionDenied(PermissionState),
    #[error("the reminder time has already passed; choose a later time")]
    PastDue { due_at: i64, now: i64 },
}

struct LiveTimer {
    generation: u64,
    reminder: Reminder,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct TimerScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    gate: PermissionGate,
    registry: ReminderRegistry,
    clock: Arc<dyn Clock>,
    timers: Mutex<HashMap<String, LiveTimer>>,
    next_generation: AtomicU64,
}

impl Drop for SchedulerInner {
    fn drop(&mut self) {
        let timers = self
            .timers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, live) in timers.drain() {
            live.handle.abort();
        }
    }
}

impl TimerScheduler {
    pub fn new(gate: PermissionGate, registry: ReminderRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                gate,
                registry,
                clock,
                timers: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Persist `reminder` and arm a timer for it, replacing any earlier
    /// reminder with the same id. Must be called from within a tokio runtime.
    pub fn arm(&self, reminder: Reminder) -> Result<(), ScheduleError> {
        let permission = self.inner.gate.current();
        if permission != PermissionState::Granted {
            warn!(
                "Not arming reminder {}: notification permission is {permission}",
                reminder.id
            );
            return Err(ScheduleError::PermissionDenied(permission));
        }

        let now = self.now_millis();
        if reminder.due_at <= now {
            warn!(
                "Not arming reminder {}: due at {} but it is already {now}",
                reminder.id, reminder.due_at
            );
            return Err(ScheduleError::PastDue {
                due_at: reminder.due_at,
                now,
            });
        }

        self.arm_at(reminder, now);
        Ok(())
    }

    /// Arm without the permission and past-due checks; the caller has
    /// already established both.
    pub(crate) fn arm_at(&self, reminder: Reminder, now: i64) {
        let delay = Duration::from_millis(u64::try_from(reminder.due_at - now).unwrap_or(0));
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let id = reminder.id.clone();

        let mut timers = self.lock_timers();
        if let Some(previous) = timers.remove(&id) {
            previous.handle.abort();
            debug!("Replaced live timer for reminder {id}");
        }

        self.inner.registry.upsert(reminder.clone());

        let weak = Arc::downgrade(&self.inner);
        let timer_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                TimerScheduler { inner }.fire(&timer_id, generation).await;
            }
        });

        info!("Armed reminder {id} to fire in {delay:?}");
        timers.insert(
            id,
            LiveTimer {
                generation,
                reminder,
                handle,
            },
        );
    }

    /// Stop the live timer for `id`, if any, and forget the reminder.
    /// Returns false when there was nothing to cancel.
    pub fn cancel(&self, id: &str) -> bool {
        let mut timers = self.lock_timers();
        let had_timer = match timers.remove(id) {
            Some(live) => {
                live.handle.abort();
                true
            }
            None => false,
        };
        let had_entry = self.inner.registry.remove(id);
        drop(timers);

        if had_timer || had_entry {
            info!("Cancelled reminder {id}");
        }
        had_timer || had_entry
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.lock_timers().contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.lock_timers().len()
    }

    /// Reminders waiting in the registry, armed or dormant
    pub fn pending(&self) -> Vec<Reminder> {
        self.inner.registry.all()
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.inner.gate
    }

    pub fn registry(&self) -> &ReminderRegistry {
        &self.inner.registry
    }

    pub fn now_millis(&self) -> i64 {
        self.inner.clock.now_millis()
    }

    async fn fire(&self, id: &str, generation: u64) {
        let claimed = {
            let mut timers = self.lock_timers();
            let is_current = timers
                .get(id)
                .map(|live| live.generation == generation)
                .unwrap_or(false);
            if is_current {
                timers.remove(id)
            } else {
                None
            }
        };

        let Some(live) = claimed else {
            debug!("Timer {generation} for reminder {id} was superseded");
            return;
        };
        let reminder = live.reminder;

        if !self.inner.gate.is_granted() {
            warn!("Permission withdrawn; reminder {id} stays dormant in the registry");
            return;
        }

        if let Err(e) = self
            .inner
            .gate
            .host()
            .show(&reminder.title, &reminder.body)
            .await
        {
            warn!("Failed to display reminder {id}: {e}");
        }

        // A re-arm during `show` owns the registry entry now
        let timers = self.lock_timers();
        if !timers.contains_key(id) {
            self.inner.registry.remove_exact(&reminder);
        }
        drop(timers);

        info!("Fired reminder {id}");
    }

    fn lock_timers(&self) -> MutexGuard<'_, HashMap<String, LiveTimer>> {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::reminders::testing::RecordingHost;
    use crate::store::PersistentStore;
    use tokio::time::sleep;

    const NOW: i64 = 1_760_000_000_000;

    struct Fixture {
        host: Arc<RecordingHost>,
        clock: Arc<ManualClock>,
        registry: ReminderRegistry,
        scheduler: TimerScheduler,
    }

    fn fixture(permission: PermissionState) -> Fixture {
        let host = Arc::new(RecordingHost::new(permission));
        let clock = Arc::new(ManualClock::new(NOW));
        let registry = ReminderRegistry::new(PersistentStore::in_memory());
        let scheduler = TimerScheduler::new(
            PermissionGate::new(host.clone()),
            registry.clone(),
            clock.clone(),
        );
        Fixture {
            host,
            clock,
            registry,
            scheduler,
        }
    }

    fn shown(title: &str, body: &str) -> (String, String) {
        (title.to_string(), body.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_fires_once_and_clears_registry() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a1", "Dose", "Take pill", NOW + 100))
            .unwrap();
        assert!(f.scheduler.is_armed("a1"));
        assert!(f.registry.get("a1").is_some());

        sleep(Duration::from_millis(150)).await;

        assert_eq!(f.host.shown(), vec![shown("Dose", "Take pill")]);
        assert!(f.registry.get("a1").is_none());
        assert!(!f.scheduler.is_armed("a1"));

        sleep(Duration::from_secs(60)).await;
        assert_eq!(f.host.shown().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_fires_early() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "T", "B", NOW + 5_000))
            .unwrap();

        sleep(Duration::from_millis(4_999)).await;
        assert!(f.host.shown().is_empty());
        assert!(f.scheduler.is_armed("a"));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(f.host.shown().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_keeps_one_timer_and_one_entry() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "First", "one", NOW + 1_000))
            .unwrap();
        f.scheduler
            .arm(Reminder::new("a", "Second", "two", NOW + 2_000))
            .unwrap();

        assert_eq!(f.scheduler.armed_count(), 1);
        assert_eq!(f.registry.all().len(), 1);

        sleep(Duration::from_millis(3_000)).await;
        assert_eq!(f.host.shown(), vec![shown("Second", "two")]);
        assert!(f.registry.all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_due_never_fires() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "T", "B", NOW + 5_000))
            .unwrap();

        sleep(Duration::from_millis(2_000)).await;
        assert!(f.scheduler.cancel("a"));
        assert!(!f.scheduler.cancel("a"));

        sleep(Duration::from_secs(10)).await;
        assert!(f.host.shown().is_empty());
        assert!(f.registry.all().is_empty());
        assert_eq!(f.scheduler.armed_count(), 0);
    }

    #[tokio::test]
    async fn test_past_due_is_rejected_without_side_effects() {
        let f = fixture(PermissionState::Granted);

        let err = f
            .scheduler
            .arm(Reminder::new("a", "T", "B", NOW - 1))
            .unwrap_err();
        assert_eq!(err, ScheduleError::PastDue { due_at: NOW - 1, now: NOW });

        let err = f.scheduler.arm(Reminder::new("a", "T", "B", NOW)).unwrap_err();
        assert!(matches!(err, ScheduleError::PastDue { .. }));

        assert!(f.registry.all().is_empty());
        assert_eq!(f.scheduler.armed_count(), 0);
    }

    #[tokio::test]
    async fn test_permission_gates_arming() {
        for state in [PermissionState::Default, PermissionState::Denied] {
            let f = fixture(state);
            let err = f
                .scheduler
                .arm(Reminder::new("a", "T", "B", NOW + 1_000))
                .unwrap_err();
            assert_eq!(err, ScheduleError::PermissionDenied(state));
            assert!(f.registry.all().is_empty());
            assert_eq!(f.scheduler.armed_count(), 0);
            // The scheduler never asks on the caller's behalf
            assert_eq!(f.host.requests(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_withdrawn_permission_leaves_entry_dormant() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "T", "B", NOW + 1_000))
            .unwrap();
        f.host.set_permission(PermissionState::Denied);

        sleep(Duration::from_millis(1_500)).await;
        assert!(f.host.shown().is_empty());
        assert!(f.registry.get("a").is_some());
        assert!(!f.scheduler.is_armed("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_stops_timers_but_keeps_registry() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "T", "B", NOW + 1_000))
            .unwrap();

        drop(f.scheduler);
        sleep(Duration::from_millis(2_000)).await;

        assert!(f.host.shown().is_empty());
        assert!(f.registry.get("a").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_ids_fire_independently() {
        let f = fixture(PermissionState::Granted);
        f.scheduler
            .arm(Reminder::new("a", "A", "first", NOW + 1_000))
            .unwrap();
        f.scheduler
            .arm(Reminder::new("b", "B", "second", NOW + 2_000))
            .unwrap();
        assert_eq!(f.scheduler.armed_count(), 2);

        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(f.host.shown(), vec![shown("A", "first")]);
        assert!(f.scheduler.is_armed("b"));

        f.clock.advance(1_500);
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(f.host.shown().len(), 2);
        assert!(f.registry.all().is_empty());
    }
}

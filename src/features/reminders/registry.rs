//! Durable list of pending reminders
//!
//! Stored under a single key as a JSON array of `{id, title, body, timestamp}`.
//! Entries that fail to parse are skipped on read and dropped by the next
//! write, so a half-written record never blocks the rest.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::PersistentStore;

pub const REGISTRY_KEY: &str = "scheduledNotifications";

/// A pending alert tied to the treatment or appointment it reminds about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Id of the owning treatment or appointment
    pub id: String,
    pub title: String,
    pub body: String,
    /// Epoch milliseconds at which the alert is due
    #[serde(rename = "timestamp")]
    pub due_at: i64,
}

impl Reminder {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        due_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            due_at,
        }
    }
}

#[derive(Clone)]
pub struct ReminderRegistry {
    store: PersistentStore,
}

impl ReminderRegistry {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Snapshot of every well-formed entry, in stored order
    pub fn all(&self) -> Vec<Reminder> {
        self.load().0
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.all().into_iter().find(|r| r.id == id)
    }

    /// Replace any entry with the same id, else append
    pub fn upsert(&self, reminder: Reminder) {
        let mut reminders = self.all();
        reminders.retain(|r| r.id != reminder.id);
        debug!("Registry upsert {} (due {})", reminder.id, reminder.due_at);
        reminders.push(reminder);
        self.save(&reminders);
    }

    /// Delete every entry with `id`. Returns false when there was none.
    pub fn remove(&self, id: &str) -> bool {
        self.remove_where(|r| r.id == id)
    }

    /// Delete the entry only if it is still exactly `reminder`; a replacement
    /// stored under the same id in the meantime is left alone.
    pub fn remove_exact(&self, reminder: &Reminder) -> bool {
        self.remove_where(|r| r == reminder)
    }

    /// Rewrite the list without unparseable entries; returns how many were dropped
    pub fn prune_malformed(&self) -> usize {
        let (reminders, malformed) = self.load();
        if malformed > 0 {
            warn!("Dropping {malformed} malformed reminder record(s)");
            self.save(&reminders);
        }
        malformed
    }

    fn remove_where<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Reminder) -> bool,
    {
        let mut reminders = self.all();
        let before = reminders.len();
        reminders.retain(|r| !predicate(r));
        if reminders.len() == before {
            return false;
        }
        self.save(&reminders);
        true
    }

    fn load(&self) -> (Vec<Reminder>, usize) {
        let raw: Vec<Value> = self.store.read(REGISTRY_KEY, Vec::new());
        let total = raw.len();
        let reminders: Vec<Reminder> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(reminder) => Some(reminder),
                Err(e) => {
                    debug!("Skipping malformed reminder record: {e}");
                    None
                }
            })
            .collect();
        let malformed = total - reminders.len();
        (reminders, malformed)
    }

    fn save(&self, reminders: &[Reminder]) {
        self.store.write(REGISTRY_KEY, &reminders);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> (PersistentStore, ReminderRegistry) {
        let store = PersistentStore::in_memory();
        (store.clone(), ReminderRegistry::new(store))
    }

    #[test]
    fn test_upsert_appends_then_replaces() {
        let (_, registry) = registry();
        registry.upsert(Reminder::new("a", "A", "first", 1_000));
        registry.upsert(Reminder::new("b", "B", "second", 2_000));
        registry.upsert(Reminder::new("a", "A", "moved", 3_000));

        let all = registry.all();
        assert_eq!(all.len(), 2);
        assert_eq!(registry.get("a").unwrap().body, "moved");
        assert_eq!(registry.get("a").unwrap().due_at, 3_000);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_, registry) = registry();
        registry.upsert(Reminder::new("a", "A", "x", 1_000));

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_remove_exact_keeps_replacement() {
        let (_, registry) = registry();
        let original = Reminder::new("a", "A", "old", 1_000);
        registry.upsert(original.clone());
        registry.upsert(Reminder::new("a", "A", "new", 2_000));

        assert!(!registry.remove_exact(&original));
        assert_eq!(registry.get("a").unwrap().body, "new");
    }

    #[test]
    fn test_stored_shape_uses_timestamp_field() {
        let (store, registry) = registry();
        registry.upsert(Reminder::new("a1", "Dose", "Take pill", 5_000));

        let raw = store.read_value(REGISTRY_KEY).unwrap();
        assert_eq!(
            raw,
            json!([{"id": "a1", "title": "Dose", "body": "Take pill", "timestamp": 5_000}])
        );
    }

    #[test]
    fn test_malformed_entries_are_skipped_and_pruned() {
        let (store, registry) = registry();
        store.write(
            REGISTRY_KEY,
            &json!([
                {"id": "ok", "title": "T", "body": "B", "timestamp": 10},
                {"id": "half-written", "title": "T"},
                "garbage"
            ]),
        );

        assert_eq!(registry.all().len(), 1);
        assert_eq!(registry.prune_malformed(), 2);
        assert_eq!(registry.prune_malformed(), 0);
        assert_eq!(store.read_value(REGISTRY_KEY).unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_non_list_value_reads_as_empty() {
        let (store, registry) = registry();
        store.write(REGISTRY_KEY, &json!({"not": "a list"}));
        assert!(registry.all().is_empty());
    }
}

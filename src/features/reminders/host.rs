//! Terminal notification host
//!
//! Alerts are printed to stdout. Consent is answered through the `allow` /
//! `deny` commands and remembered in the store, the way a platform remembers
//! a site's notification permission.

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use tokio::sync::watch;

use super::permission::{NotificationHost, PermissionState};
use crate::store::PersistentStore;

pub const PERMISSION_KEY: &str = "notificationPermission";

pub struct TerminalHost {
    store: PersistentStore,
    state: watch::Sender<PermissionState>,
}

impl TerminalHost {
    /// `initial` applies only when no answer has been recorded yet
    pub fn new(store: PersistentStore, initial: PermissionState) -> Self {
        let recorded = store.read(PERMISSION_KEY, initial);
        let (state, _) = watch::channel(recorded);
        Self { store, state }
    }

    /// Record the user's answer, waking any pending consent request
    pub fn answer(&self, state: PermissionState) {
        self.store.write(PERMISSION_KEY, &state);
        self.state.send_replace(state);
        info!("Notification permission set to {state}");
    }
}

#[async_trait]
impl NotificationHost for TerminalHost {
    fn permission(&self) -> PermissionState {
        *self.state.borrow()
    }

    async fn request_permission(&self) -> PermissionState {
        let current = self.permission();
        if current != PermissionState::Default {
            return current;
        }

        println!("🔔 carelog would like to show reminder alerts. Type `allow` or `deny`.");
        let mut rx = self.state.subscribe();
        let answered = match rx.wait_for(|state| *state != PermissionState::Default).await {
            Ok(state) => *state,
            Err(_) => self.permission(),
        };
        answered
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        println!("\n🔔 {title}\n   {body}\n");
        info!("Displayed alert '{title}'");
        Ok(())
    }
}

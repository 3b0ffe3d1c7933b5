//! Notification consent
//!
//! The host owns the consent state. `PermissionGate` only ever asks the host,
//! so a change made through the host is visible on the very next `current()`.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Consent to emit system-level alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has not been asked yet
    Default,
    Granted,
    Denied,
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::Default => write!(f, "default"),
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
        }
    }
}

impl std::str::FromStr for PermissionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(PermissionState::Default),
            "granted" => Ok(PermissionState::Granted),
            "denied" => Ok(PermissionState::Denied),
            _ => Err(anyhow::anyhow!("Invalid permission state: {}", s)),
        }
    }
}

/// The platform's notification facility
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Live consent state
    fn permission(&self) -> PermissionState;

    /// Ask the user for consent; resolves once they answer
    async fn request_permission(&self) -> PermissionState;

    /// Display an alert
    async fn show(&self, title: &str, body: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct PermissionGate {
    host: Arc<dyn NotificationHost>,
    /// Set while a consent prompt is waiting for its answer
    requesting: Arc<AtomicBool>,
}

impl PermissionGate {
    pub fn new(host: Arc<dyn NotificationHost>) -> Self {
        Self {
            host,
            requesting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn current(&self) -> PermissionState {
        self.host.permission()
    }

    pub fn is_granted(&self) -> bool {
        self.current() == PermissionState::Granted
    }

    /// Trigger the host's consent prompt without waiting for the answer.
    /// At most one prompt is outstanding; returns false if one already is.
    /// Must be called from within a tokio runtime.
    pub fn request(&self) -> bool {
        if self.requesting.swap(true, Ordering::SeqCst) {
            debug!("Consent prompt already outstanding");
            return false;
        }

        let host = Arc::clone(&self.host);
        let requesting = Arc::clone(&self.requesting);
        tokio::spawn(async move {
            let state = host.request_permission().await;
            requesting.store(false, Ordering::SeqCst);
            info!("Notification permission is now {state}");
        });
        true
    }

    pub(crate) fn host(&self) -> &Arc<dyn NotificationHost> {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::testing::RecordingHost;

    #[test]
    fn test_permission_state_parse_and_display() {
        for state in [
            PermissionState::Default,
            PermissionState::Granted,
            PermissionState::Denied,
        ] {
            assert_eq!(state.to_string().parse::<PermissionState>().unwrap(), state);
        }
        assert_eq!(" Granted ".parse::<PermissionState>().unwrap(), PermissionState::Granted);
        assert!("yes".parse::<PermissionState>().is_err());
    }

    #[test]
    fn test_gate_reads_live_host_state() {
        let host = Arc::new(RecordingHost::new(PermissionState::Default));
        let gate = PermissionGate::new(host.clone());
        assert!(!gate.is_granted());

        host.set_permission(PermissionState::Granted);
        assert_eq!(gate.current(), PermissionState::Granted);

        host.set_permission(PermissionState::Denied);
        assert_eq!(gate.current(), PermissionState::Denied);
    }

    #[tokio::test]
    async fn test_request_resolves_asynchronously() {
        let host = Arc::new(RecordingHost::new(PermissionState::Default));
        host.answer_requests_with(PermissionState::Granted);
        let gate = PermissionGate::new(host.clone());

        assert!(gate.request());
        // Not resolved synchronously
        assert_eq!(gate.current(), PermissionState::Default);

        tokio::task::yield_now().await;
        assert_eq!(gate.current(), PermissionState::Granted);
        assert_eq!(host.requests(), 1);
    }

    #[tokio::test]
    async fn test_only_one_prompt_outstanding() {
        let host = Arc::new(RecordingHost::new(PermissionState::Default));
        let gate = PermissionGate::new(host.clone());

        assert!(gate.request());
        assert!(!gate.clone().request());
        assert!(!gate.request());

        tokio::task::yield_now().await;
        assert_eq!(host.requests(), 1);

        // Once answered, a later failure may prompt again
        assert!(gate.request());
        tokio::task::yield_now().await;
        assert_eq!(host.requests(), 2);
    }
}

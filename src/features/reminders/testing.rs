//! Test doubles for the notification host

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::permission::{NotificationHost, PermissionState};

/// Host that records every alert instead of displaying it
pub(crate) struct RecordingHost {
    permission: Mutex<PermissionState>,
    answer: Mutex<Option<PermissionState>>,
    requests: AtomicUsize,
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingHost {
    pub(crate) fn new(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            answer: Mutex::new(None),
            requests: AtomicUsize::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_permission(&self, state: PermissionState) {
        *self.permission.lock().unwrap() = state;
    }

    /// What the simulated user answers to the next consent prompt
    pub(crate) fn answer_requests_with(&self, state: PermissionState) {
        *self.answer.lock().unwrap() = Some(state);
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub(crate) fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationHost for RecordingHost {
    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionState {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let answer = *self.answer.lock().unwrap();
        if let Some(state) = answer {
            self.set_permission(state);
        }
        self.permission()
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

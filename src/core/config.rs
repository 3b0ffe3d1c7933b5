//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Result};
use std::env;

use crate::core::text::parse_duration;
use crate::features::reminders::{MissedReminderPolicy, PermissionState};

const DEFAULT_DATABASE_PATH: &str = "carelog.db";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_APPOINTMENT_OFFSET: &str = "1h";

#[derive(Debug, Clone)]
pub struct Config {
    /// sqlite file holding every persisted key
    pub database_path: String,
    pub log_level: String,
    /// Consent assumed by the terminal host when none has been recorded yet
    pub initial_permission: PermissionState,
    /// How long before an appointment its reminder fires
    pub appointment_reminder_offset_ms: i64,
    pub missed_reminders: MissedReminderPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("CARELOG_DATABASE_PATH")
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let log_level =
            lookup("CARELOG_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let initial_permission = match lookup("CARELOG_NOTIFICATION_PERMISSION") {
            Some(value) => value
                .parse()
                .map_err(|e| anyhow!("CARELOG_NOTIFICATION_PERMISSION: {e}"))?,
            None => PermissionState::Default,
        };

        let offset = lookup("CARELOG_APPOINTMENT_REMINDER_OFFSET")
            .unwrap_or_else(|| DEFAULT_APPOINTMENT_OFFSET.to_string());
        let offset_seconds = parse_duration(&offset).ok_or_else(|| {
            anyhow!("CARELOG_APPOINTMENT_REMINDER_OFFSET: invalid duration '{offset}'")
        })?;

        let appointment_reminder_offset_ms = offset_seconds.checked_mul(1000).ok_or_else(|| {
            anyhow!("CARELOG_APPOINTMENT_REMINDER_OFFSET: duration '{offset}' is too long")
        })?;

        let missed_reminders = match lookup("CARELOG_MISSED_REMINDERS") {
            Some(value) => value
                .parse()
                .map_err(|e| anyhow!("CARELOG_MISSED_REMINDERS: {e}"))?,
            None => MissedReminderPolicy::Discard,
        };

        Ok(Self {
            database_path,
            log_level,
            initial_permission,
            appointment_reminder_offset_ms,
            missed_reminders,
        })
    }
}

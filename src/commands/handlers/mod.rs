//! Per-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Utility, treatment, reminder, appointment and daily log handlers

pub mod appointments;
pub mod daily;
pub mod remind;
pub mod treatments;
pub mod utility;

use chrono::{Local, TimeZone};
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::CommandHandler;
use crate::core::format_duration;
use crate::features::reminders::{PermissionState, ScheduleError};

/// Create all registered command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(treatments::TreatmentHandler),
        Arc::new(remind::RemindHandler),
        Arc::new(appointments::AppointmentHandler),
        Arc::new(daily::DailyLogHandler),
    ]
}

/// "in 2 hours (18/10/2026 09:30)"
pub(crate) fn describe_due(due_at: i64, now: i64) -> String {
    let remaining = format_duration(((due_at - now) / 1000).max(0));
    match Local.timestamp_millis_opt(due_at).single() {
        Some(at) => format!("in {remaining} ({})", at.format("%d/%m/%Y %H:%M")),
        None => format!("in {remaining}"),
    }
}

/// User-facing text for a reminder that could not be armed. When consent was
/// never asked for, the consent prompt is raised as well.
pub(crate) fn schedule_failure(ctx: &CommandContext, error: &ScheduleError) -> String {
    match error {
        ScheduleError::PermissionDenied(PermissionState::Default) => {
            ctx.scheduler.gate().request();
            "⚠️ Please allow notifications to receive reminders.".to_string()
        }
        ScheduleError::PermissionDenied(_) => {
            "⚠️ Notifications are blocked, so no reminder was set. Type `allow` to turn them back on."
                .to_string()
        }
        ScheduleError::PastDue { .. } => {
            "⚠️ That time has already passed; choose a later time.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_due_counts_down() {
        let now = 1_900_000_000_000;
        assert!(describe_due(now + 2 * 3_600_000, now).starts_with("in 2 hours ("));
        assert!(describe_due(now - 5_000, now).starts_with("in 0 seconds"));
    }
}

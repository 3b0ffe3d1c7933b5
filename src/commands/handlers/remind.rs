//! Reminder command handlers
//!
//! Handles: remind, reminders, cancel
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use super::{describe_due, schedule_failure};
use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::core::parse_due;
use crate::features::reminders::ScheduleError;

/// Handler for reminder-related commands
pub struct RemindHandler;

#[async_trait]
impl CommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["remind", "reminders", "cancel"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
        match invocation.name.as_str() {
            "remind" => self.handle_remind(&ctx, invocation),
            "cancel" => self.handle_cancel(&ctx, invocation),
            _ => Ok(self.handle_list(&ctx)),
        }
    }
}

impl RemindHandler {
    /// `remind <treatment-id> <when>`; re-reminding replaces the earlier time
    fn handle_remind(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<String> {
        let (id, when) = invocation.subcommand();
        if id.is_empty() || when.is_empty() {
            bail!("Usage: remind <treatment-id> <duration|YYYY-MM-DDTHH:MM>");
        }

        let now = ctx.scheduler.now_millis();
        let due_at = parse_due(when, now).ok_or_else(|| {
            anyhow!("Invalid time `{when}`. Use `30m`, `2h`, `1h30m` or `2026-10-18T09:30`.")
        })?;

        match ctx.treatments.set_reminder(id, due_at) {
            Ok(reminder) => {
                info!("Reminder set for treatment {id}");
                Ok(format!(
                    "⏰ Got it! I'll remind you {}:\n> {}",
                    describe_due(reminder.due_at, now),
                    reminder.body
                ))
            }
            Err(e) => match e.downcast_ref::<ScheduleError>() {
                Some(schedule_error) => Ok(schedule_failure(ctx, schedule_error)),
                None => Err(e),
            },
        }
    }

    fn handle_cancel(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<String> {
        let id = invocation.args.trim();
        if id.is_empty() {
            bail!("Usage: cancel <id>");
        }
        if ctx.scheduler.cancel(id) {
            Ok(format!("✅ Reminder `{id}` cancelled."))
        } else {
            bail!("No pending reminder with id `{id}`")
        }
    }

    fn handle_list(&self, ctx: &CommandContext) -> String {
        let mut pending = ctx.scheduler.pending();
        if pending.is_empty() {
            return "📭 No pending reminders.".to_string();
        }
        pending.sort_by_key(|r| r.due_at);

        let now = ctx.scheduler.now_millis();
        let mut output = format!("⏰ Pending reminders ({}):\n", pending.len());
        for reminder in pending {
            let state = if ctx.scheduler.is_armed(&reminder.id) {
                ""
            } else {
                " [waiting for permission]"
            };
            output.push_str(&format!(
                "  `{}` {} {}{}\n",
                reminder.id,
                reminder.title,
                describe_due(reminder.due_at, now),
                state
            ));
        }
        output
    }
}

//! Utility command handlers
//!
//! Handles: help, permission, allow, deny
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::features::reminders::PermissionState;

pub const HELP_TEXT: &str = r#"Available commands:
  help                                   Show this help message
  permission                             Show the notification permission
  allow | deny                           Allow or block reminder alerts

  treatments                             List treatments
  treatment add <name> [| notes]         Add a treatment
  treatment remove <id>                  Delete a treatment and its reminder
  remind <treatment-id> <when>           Remind about a treatment (30m, 1h30m, 2026-10-18T09:30)

  appointments                           List appointments
  appointment add <specialist> | <date> | [time] | [notes] [| remind]
  appointment remove <id>                Delete an appointment and its reminder

  reminders                              List pending reminders
  cancel <id>                            Cancel a reminder

  log <date|today> <pain 0-10> [| notes] Record how the day went, optionally adding
      [| symptoms Fatiga:2:Constante, ...] [| sleep 1-5] [| mood Feliz|Normal|Irritable|Ansioso|Triste]
      [| activity 1-5]
  logs                                   List daily logs
  log remove <id>                        Delete a daily log

  quit                                   Exit (pending reminders are restored next time)"#;

/// Handler for utility commands: help, permission, allow, deny
pub struct UtilityHandler;

#[async_trait]
impl CommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help", "permission", "allow", "deny"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
        match invocation.name.as_str() {
            "permission" => Ok(format!(
                "Notification permission: {}",
                ctx.scheduler.gate().current()
            )),
            "allow" => Ok(self.handle_allow(&ctx).await),
            "deny" => {
                ctx.host.answer(PermissionState::Denied);
                Ok("🔕 Notifications blocked. Pending reminders stay saved but will not alert.".to_string())
            }
            _ => Ok(HELP_TEXT.to_string()),
        }
    }
}

impl UtilityHandler {
    /// Grant consent, then restore reminders if startup had to skip that
    async fn handle_allow(&self, ctx: &CommandContext) -> String {
        ctx.host.answer(PermissionState::Granted);
        let mut output = "🔔 Notifications allowed.".to_string();

        if let Some(report) = ctx.reconcile_if_pending().await {
            if !report.rearmed.is_empty() {
                output.push_str(&format!(
                    " Restored {} saved reminder(s).",
                    report.rearmed.len()
                ));
            }
            if !report.discarded.is_empty() {
                output.push_str(&format!(
                    " {} reminder(s) came due while notifications were off and were dropped.",
                    report.discarded.len()
                ));
            }
        }
        output
    }
}

//! Appointment command handlers
//!
//! Handles: appointments, appointment add, appointment remove
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use super::{describe_due, schedule_failure};
use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::{fields, Invocation};
use crate::features::journal::{NewAppointment, ReminderOutcome};

const ADD_USAGE: &str =
    "Usage: appointment add <specialist> | <YYYY-MM-DD> | [HH:MM] | [notes] [| remind]";

/// Handler for appointment commands
pub struct AppointmentHandler;

#[async_trait]
impl CommandHandler for AppointmentHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["appointments", "appointment"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
        if invocation.name == "appointments" {
            return Ok(self.list(&ctx));
        }

        match invocation.subcommand() {
            ("add", rest) => self.handle_add(&ctx, rest),
            ("remove", id) if !id.is_empty() => {
                if ctx.appointments.remove(id) {
                    Ok(format!("🗑️ Removed appointment `{id}` and any reminder for it."))
                } else {
                    bail!("No appointment with id `{id}`")
                }
            }
            ("", _) | ("list", _) => Ok(self.list(&ctx)),
            _ => bail!("{ADD_USAGE} / appointment remove <id>"),
        }
    }
}

impl AppointmentHandler {
    fn handle_add(&self, ctx: &CommandContext, rest: &str) -> Result<String> {
        let parts = fields(rest);
        if parts.len() < 2 {
            bail!(ADD_USAGE);
        }

        let date = NaiveDate::parse_from_str(parts[1], "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date `{}`. {ADD_USAGE}", parts[1]))?;
        let time = match parts.get(2).copied().unwrap_or_default() {
            "" => None,
            raw => Some(
                NaiveTime::parse_from_str(raw, "%H:%M")
                    .map_err(|_| anyhow!("Invalid time `{raw}`. {ADD_USAGE}"))?,
            ),
        };
        let remind = parts
            .get(4)
            .map(|flag| flag.eq_ignore_ascii_case("remind"))
            .unwrap_or(false);

        let (appointment, outcome) = ctx.appointments.add(NewAppointment {
            specialist: parts[0].to_string(),
            date,
            time,
            notes: parts.get(3).copied().unwrap_or_default().to_string(),
            remind,
        })?;

        let mut output = format!(
            "📅 Saved appointment with **{}** on {} (id `{}`).",
            appointment.specialist, appointment.date, appointment.id
        );
        match outcome {
            ReminderOutcome::NotRequested => {}
            ReminderOutcome::Set { due_at } => output.push_str(&format!(
                "\n⏰ I'll remind you {}.",
                describe_due(due_at, ctx.scheduler.now_millis())
            )),
            ReminderOutcome::MissingTime => {
                output.push_str("\n⚠️ A reminder needs the appointment time; none was set.")
            }
            ReminderOutcome::Failed(error) => {
                output.push('\n');
                output.push_str(&schedule_failure(ctx, &error));
            }
        }
        Ok(output)
    }

    fn list(&self, ctx: &CommandContext) -> String {
        let appointments = ctx.appointments.list();
        if appointments.is_empty() {
            return "No appointments yet.".to_string();
        }

        let mut output = String::from("Appointments:\n");
        for appointment in appointments {
            output.push_str(&format!(
                "  `{}` {} {} {}",
                appointment.id, appointment.date, appointment.time, appointment.specialist
            ));
            if !appointment.notes.is_empty() {
                output.push_str(&format!(" - {}", appointment.notes));
            }
            if appointment.reminder_set && ctx.scheduler.registry().get(&appointment.id).is_some() {
                output.push_str(" ⏰");
            }
            output.push('\n');
        }
        output
    }
}

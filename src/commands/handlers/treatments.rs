//! Treatment command handlers
//!
//! Handles: treatments, treatment add, treatment remove
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;

use super::describe_due;
use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::{fields, Invocation};

/// Handler for treatment commands
pub struct TreatmentHandler;

#[async_trait]
impl CommandHandler for TreatmentHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["treatments", "treatment"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
        if invocation.name == "treatments" {
            return Ok(self.list(&ctx));
        }

        match invocation.subcommand() {
            ("add", rest) => {
                let parts = fields(rest);
                let name = parts.first().copied().unwrap_or_default();
                let notes = parts.get(1).copied().unwrap_or_default();
                let treatment = ctx.treatments.add(name, notes)?;
                Ok(format!(
                    "💊 Added **{}** (id `{}`). Use `remind {} <when>` to set a reminder.",
                    treatment.name, treatment.id, treatment.id
                ))
            }
            ("remove", id) if !id.is_empty() => {
                if ctx.treatments.remove(id) {
                    Ok(format!("🗑️ Removed treatment `{id}` and any reminder for it."))
                } else {
                    bail!("No treatment with id `{id}`")
                }
            }
            ("", _) | ("list", _) => Ok(self.list(&ctx)),
            _ => bail!("Usage: treatment add <name> [| notes] / treatment remove <id>"),
        }
    }
}

impl TreatmentHandler {
    fn list(&self, ctx: &CommandContext) -> String {
        let treatments = ctx.treatments.list();
        if treatments.is_empty() {
            return "No treatments yet. Add one with `treatment add <name> [| notes]`.".to_string();
        }

        let now = ctx.scheduler.now_millis();
        let mut output = String::from("Treatments:\n");
        for treatment in treatments {
            output.push_str(&format!(
                "  `{}` {} (added {})",
                treatment.id, treatment.name, treatment.date_added
            ));
            if !treatment.notes.is_empty() {
                output.push_str(&format!(" - {}", treatment.notes));
            }
            if let Some(reminder) = ctx.scheduler.registry().get(&treatment.id) {
                output.push_str(&format!(" ⏰ {}", describe_due(reminder.due_at, now)));
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{context, NOW};

    async fn run(ctx: &Arc<CommandContext>, line: &str) -> Result<String> {
        TreatmentHandler
            .handle(ctx.clone(), &Invocation::parse(line).unwrap())
            .await
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let (ctx, _) = context();
        let output = run(&ctx, "treatment add Metotrexato | con comida").await.unwrap();
        assert!(output.contains("Metotrexato"));

        let treatment = ctx.treatments.list().remove(0);
        assert_eq!(treatment.notes, "con comida");

        ctx.treatments.set_reminder(&treatment.id, NOW + 3_600_000).unwrap();
        let listing = run(&ctx, "treatments").await.unwrap();
        assert!(listing.contains("Metotrexato"));
        assert!(listing.contains("⏰ in 1 hour"));

        run(&ctx, &format!("treatment remove {}", treatment.id)).await.unwrap();
        assert!(ctx.treatments.list().is_empty());
        assert!(!ctx.scheduler.is_armed(&treatment.id));
        assert!(run(&ctx, &format!("treatment remove {}", treatment.id)).await.is_err());
    }

    #[tokio::test]
    async fn test_add_requires_name() {
        let (ctx, _) = context();
        assert!(run(&ctx, "treatment add").await.is_err());
        assert!(run(&ctx, "treatment frobnicate").await.is_err());
    }
}

//! Daily log command handlers
//!
//! Handles: log, logs
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Symptoms, sleep, mood and activity fields on `log`
//! - 1.0.0: Initial release

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandHandler;
use crate::commands::invocation::{fields, Invocation};
use crate::features::journal::daily_logs::{canonical, MOODS};
use crate::features::journal::{DailyLog, SymptomLog};

const USAGE: &str = "Usage: log <YYYY-MM-DD|today> <pain 0-10> [| notes] [| symptoms Fatiga:2:Constante, ...] \
     [| sleep 1-5] [| mood Feliz|Normal|Irritable|Ansioso|Triste] [| activity 1-5] / log remove <id>";

fn scale(label: &str, value: &str) -> Result<u8> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {label} value `{value}`; use 1-5"))
}

/// Handler for daily log commands
pub struct DailyLogHandler;

#[async_trait]
impl CommandHandler for DailyLogHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["log", "logs"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &Invocation) -> Result<String> {
        if invocation.name == "logs" {
            return Ok(self.list(&ctx));
        }

        match invocation.subcommand() {
            ("remove", id) if !id.is_empty() => {
                if ctx.daily_logs.remove(id) {
                    Ok(format!("🗑️ Removed daily log `{id}`."))
                } else {
                    bail!("No daily log with id `{id}`")
                }
            }
            ("", _) => bail!(USAGE),
            (date, rest) => self.handle_save(&ctx, date, rest),
        }
    }
}

impl DailyLogHandler {
    fn handle_save(&self, ctx: &CommandContext, date: &str, rest: &str) -> Result<String> {
        let date = if date.eq_ignore_ascii_case("today") {
            Local::now().date_naive()
        } else {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| anyhow!("Invalid date `{date}`. {USAGE}"))?
        };

        let parts = fields(rest);
        let pain = parts.first().copied().unwrap_or_default();
        let pain_level: u8 = pain
            .parse()
            .map_err(|_| anyhow!("Invalid pain level `{pain}`. {USAGE}"))?;

        let mut log = DailyLog::new(date, pain_level, "");
        let mut notes_seen = false;
        for field in parts.iter().skip(1) {
            let (tag, value) = match field.split_once(char::is_whitespace) {
                Some((tag, value)) => (tag.to_lowercase(), value.trim()),
                None => (field.to_lowercase(), ""),
            };
            match tag.as_str() {
                "symptoms" => {
                    log.symptoms = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(SymptomLog::parse)
                        .collect::<Result<_>>()?;
                }
                "sleep" => log.sleep_quality = Some(scale(&tag, value)?),
                "activity" => log.activity_level = Some(scale(&tag, value)?),
                "mood" => {
                    let mood = canonical(&MOODS, value).ok_or_else(|| {
                        anyhow!("Unknown mood `{value}`. Use one of {}", MOODS.join(", "))
                    })?;
                    log.mood = Some(mood.to_string());
                }
                _ if !notes_seen => {
                    notes_seen = true;
                    log.notes = field.to_string();
                }
                _ => bail!("Unexpected field `{field}`. {USAGE}"),
            }
        }

        let replaced = ctx.daily_logs.for_date(date).is_some();
        let log = ctx.daily_logs.save(log)?;
        let verb = if replaced { "Updated" } else { "Saved" };
        Ok(format!(
            "📝 {verb} log for {} (pain {}/10, {} symptom(s)).",
            log.date,
            log.pain_level,
            log.symptoms.len()
        ))
    }

    fn list(&self, ctx: &CommandContext) -> String {
        let logs = ctx.daily_logs.list();
        if logs.is_empty() {
            return "No daily logs yet.".to_string();
        }

        let mut output = String::from("Daily logs:\n");
        for log in logs {
            output.push_str(&format!("  {} pain {}/10", log.date, log.pain_level));
            if !log.symptoms.is_empty() {
                let symptoms: Vec<String> = log
                    .symptoms
                    .iter()
                    .map(|s| format!("{} {} {}", s.name, s.severity_label(), s.duration))
                    .collect();
                output.push_str(&format!(" [{}]", symptoms.join(", ")));
            }
            if let Some(mood) = &log.mood {
                output.push_str(&format!(" mood {mood}"));
            }
            if let Some(sleep) = log.sleep_quality {
                output.push_str(&format!(" sleep {sleep}/5"));
            }
            if let Some(activity) = log.activity_level {
                output.push_str(&format!(" activity {activity}/5"));
            }
            if !log.notes.is_empty() {
                output.push_str(&format!(" - {}", log.notes));
            }
            output.push_str(&format!(" (id `{}`)\n", log.id));
        }
        output
    }
}

//! Daily symptom log, one entry per calendar day
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Symptom parsing, mood options and form defaults for sleep, mood and activity
//! - 1.0.0: Initial release

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::store::PersistentStore;

pub const DAILY_LOGS_KEY: &str = "dailyLogs";
pub const MAX_PAIN_LEVEL: u8 = 10;
pub const DEFAULT_SLEEP_QUALITY: u8 = 3;
pub const DEFAULT_ACTIVITY_LEVEL: u8 = 3;
pub const DEFAULT_MOOD: &str = "Normal";
pub const MOODS: [&str; 5] = ["Feliz", "Normal", "Irritable", "Ansioso", "Triste"];
pub const SEVERITIES: [&str; 3] = ["Leve", "Moderado", "Severo"];
pub const DURATIONS: [&str; 2] = ["Intermitente", "Constante"];

/// Case-insensitive lookup returning the canonical spelling
pub(crate) fn canonical(options: &[&'static str], value: &str) -> Option<&'static str> {
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(value.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomLog {
    pub name: String,
    /// 1 = Leve, 2 = Moderado, 3 = Severo
    pub severity: u8,
    /// "Intermitente" or "Constante"
    pub duration: String,
}

impl SymptomLog {
    /// Parse `name[:severity[:duration]]`, where severity is 1-3 or
    /// Leve/Moderado/Severo. Defaults to Leve and Intermitente.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            bail!("A symptom needs a name");
        }

        let severity = match parts.next() {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<u8>() {
                Ok(level) => level,
                Err(_) => match SEVERITIES.iter().position(|s| s.eq_ignore_ascii_case(raw)) {
                    Some(index) => index as u8 + 1,
                    None => bail!("Unknown severity '{raw}' for '{name}'"),
                },
            },
        };

        let duration = match parts.next() {
            None | Some("") => DURATIONS[0],
            Some(raw) => canonical(&DURATIONS, raw)
                .ok_or_else(|| anyhow!("Unknown duration '{raw}' for '{name}'"))?,
        };

        if parts.next().is_some() {
            bail!("Too many parts in symptom '{input}'");
        }

        Ok(Self {
            name: name.to_string(),
            severity,
            duration: duration.to_string(),
        })
    }

    pub fn severity_label(&self) -> &'static str {
        SEVERITIES
            .get(usize::from(self.severity.saturating_sub(1)))
            .copied()
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub pain_level: u8,
    #[serde(default)]
    pub symptoms: Vec<SymptomLog>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<u8>,
}

impl DailyLog {
    /// Entry with the form defaults for sleep, mood and activity
    pub fn new(date: NaiveDate, pain_level: u8, notes: impl Into<String>) -> Self {
        let date = date.format("%Y-%m-%d").to_string();
        Self {
            id: format!("{date}T00:00:00.000Z"),
            date,
            pain_level,
            symptoms: Vec::new(),
            notes: notes.into(),
            sleep_quality: Some(DEFAULT_SLEEP_QUALITY),
            mood: Some(DEFAULT_MOOD.to_string()),
            activity_level: Some(DEFAULT_ACTIVITY_LEVEL),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pain_level > MAX_PAIN_LEVEL {
            bail!("Pain level must be between 0 and {MAX_PAIN_LEVEL}");
        }
        for symptom in &self.symptoms {
            if !(1..=3).contains(&symptom.severity) {
                bail!("Severity of '{}' must be between 1 and 3", symptom.name);
            }
            if canonical(&DURATIONS, &symptom.duration).is_none() {
                bail!("Duration of '{}' must be one of {}", symptom.name, DURATIONS.join(", "));
            }
        }
        if let Some(mood) = &self.mood {
            if canonical(&MOODS, mood).is_none() {
                bail!("Mood must be one of {}", MOODS.join(", "));
            }
        }
        for (label, value) in [
            ("Sleep quality", self.sleep_quality),
            ("Activity level", self.activity_level),
        ] {
            if let Some(v) = value {
                if !(1..=5).contains(&v) {
                    bail!("{label} must be between 1 and 5");
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct DailyLogBook {
    store: PersistentStore,
}

impl DailyLogBook {
    pub fn new(store: PersistentStore) -> Self {
        Self { store }
    }

    /// Newest day first
    pub fn list(&self) -> Vec<DailyLog> {
        self.store.read(DAILY_LOGS_KEY, Vec::new())
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<DailyLog> {
        let date = date.format("%Y-%m-%d").to_string();
        self.list().into_iter().find(|l| l.date == date)
    }

    /// Save the entry, replacing any earlier entry for the same day
    pub fn save(&self, log: DailyLog) -> Result<DailyLog> {
        log.validate()?;

        let mut logs = self.list();
        logs.retain(|l| l.date != log.date);
        logs.push(log.clone());
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        self.store.write(DAILY_LOGS_KEY, &logs);

        info!("Saved daily log for {} (pain {})", log.date, log.pain_level);
        Ok(log)
    }

    /// Returns false if unknown
    pub fn remove(&self, id: &str) -> bool {
        let mut logs = self.list();
        let before = logs.len();
        logs.retain(|l| l.id != id);
        if logs.len() == before {
            return false;
        }
        self.store.write(DAILY_LOGS_KEY, &logs);
        info!("Removed daily log {id}");
        true
    }
}

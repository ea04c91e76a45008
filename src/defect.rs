//! Defect records and the defect table.
//!
//! The defect collection is not team-scoped: it is loaded and saved as a
//! whole under its own storage key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confirm::Confirm;
use crate::dates::blank_date;
use crate::error::{Error, Result};
use crate::fields::{DefectStatus, Environment, Severity};
use crate::stats::DefectStats;
use crate::store::{KeyValueStore, RecordStore};

/// A tracked defect. Optional text fields persist as `""` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub priority: Severity,
    #[serde(default)]
    pub status: DefectStatus,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub reported_by: String,
    #[serde(default, with = "blank_date")]
    pub reported_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub resolved_date: Option<NaiveDate>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub module: String,
}

/// Form input for a defect. Only the title is required.
#[derive(Debug, Clone, Default)]
pub struct DefectDraft {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub priority: Severity,
    pub status: DefectStatus,
    pub assignee: String,
    pub reported_by: String,
    pub reported_date: Option<NaiveDate>,
    pub resolved_date: Option<NaiveDate>,
    pub environment: Environment,
    pub module: String,
}

impl DefectDraft {
    pub fn from_defect(d: &Defect) -> Self {
        DefectDraft {
            title: d.title.clone(),
            description: d.description.clone(),
            severity: d.severity,
            priority: d.priority,
            status: d.status,
            assignee: d.assignee.clone(),
            reported_by: d.reported_by.clone(),
            reported_date: d.reported_date,
            resolved_date: d.resolved_date,
            environment: d.environment,
            module: d.module.clone(),
        }
    }

    /// Build the record, rejecting a blank title.
    pub fn build(self, id: String) -> Result<Defect> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::MissingField("title"));
        }
        Ok(Defect {
            id,
            title,
            description: self.description,
            severity: self.severity,
            priority: self.priority,
            status: self.status,
            assignee: self.assignee.trim().to_string(),
            reported_by: self.reported_by.trim().to_string(),
            reported_date: self.reported_date,
            resolved_date: self.resolved_date,
            environment: self.environment,
            module: self.module.trim().to_string(),
        })
    }
}

/// `DEF-<millis>`, bumped past any existing numeric suffix.
pub fn next_defect_id(existing: &[Defect], now_ms: u64) -> Result<String> {
    let max = existing
        .iter()
        .filter_map(|d| d.id.strip_prefix("DEF-")?.parse::<u64>().ok())
        .max();
    let n = match max {
        Some(m) => now_ms.max(m.checked_add(1).ok_or(Error::IdsExhausted("defect"))?),
        None => now_ms,
    };
    Ok(format!("DEF-{n}"))
}

/// In-memory snapshot of the defect collection.
#[derive(Debug, Default)]
pub struct DefectTable {
    pub defects: Vec<Defect>,
}

impl DefectTable {
    pub fn load<S: KeyValueStore>(store: &RecordStore<S>) -> Self {
        DefectTable { defects: store.load_defects() }
    }

    pub fn get(&self, id: &str) -> Option<&Defect> {
        self.defects.iter().find(|d| d.id == id)
    }

    pub fn create<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        draft: DefectDraft,
        now_ms: u64,
    ) -> Result<&Defect> {
        let id = next_defect_id(&self.defects, now_ms)?;
        let defect = draft.build(id)?;
        debug!(id = %defect.id, "creating defect");
        self.defects.push(defect);
        store.save_defects(&self.defects)?;
        Ok(&self.defects[self.defects.len() - 1])
    }

    /// Replace the whole record, keeping its id.
    pub fn update<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        id: &str,
        draft: DefectDraft,
    ) -> Result<()> {
        let idx = self
            .defects
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::DefectNotFound(id.to_string()))?;
        self.defects[idx] = draft.build(id.to_string())?;
        store.save_defects(&self.defects)
    }

    /// Delete after confirmation. Returns `false` when the user declined.
    pub fn delete<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<bool> {
        if self.get(id).is_none() {
            return Err(Error::DefectNotFound(id.to_string()));
        }
        if !confirm.confirm("Are you sure you want to delete this defect?") {
            debug!(id, "defect deletion declined");
            return Ok(false);
        }
        self.defects.retain(|d| d.id != id);
        store.save_defects(&self.defects)?;
        Ok(true)
    }

    pub fn stats(&self) -> DefectStats {
        DefectStats::compute(&self.defects)
    }
}

//! Task records and their validated construction.
//!
//! A `Task` is one card on a team board. Field names follow the persisted
//! camelCase layout of the `jira-tasks` document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{TaskPriority, TaskStatus};

/// A work item on a team board.
///
/// `name` is the person who filled in the form; `assignee` is the team member
/// doing the work and decides which board shows the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub story: String,
    pub status: TaskStatus,
    pub assignee: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: TaskPriority,
    #[serde(default)]
    pub board: String,
}

/// Form input for creating or editing a task. Every field is required;
/// `validate` turns a draft into the checked field set a `Task` is built from.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub story: String,
    pub name: String,
    pub assignee: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

/// Fields of a draft that passed validation.
#[derive(Debug, Clone)]
pub struct TaskFields {
    pub story: String,
    pub name: String,
    pub assignee: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: TaskPriority,
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(trimmed.to_string())
}

impl TaskDraft {
    /// Prefill a draft from an existing task, for full-record edits.
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            story: task.story.clone(),
            name: task.name.clone(),
            assignee: task.assignee.clone(),
            start_date: Some(task.start_date),
            end_date: Some(task.end_date),
            priority: Some(task.priority),
        }
    }

    pub fn validate(&self) -> Result<TaskFields> {
        Ok(TaskFields {
            story: required(&self.story, "story")?,
            name: required(&self.name, "name")?,
            assignee: required(&self.assignee, "assignee")?,
            start_date: self.start_date.ok_or(Error::MissingField("start date"))?,
            end_date: self.end_date.ok_or(Error::MissingField("end date"))?,
            priority: self.priority.ok_or(Error::MissingField("priority"))?,
        })
    }
}

impl Task {
    /// Build a new task in the first workflow column.
    pub fn new(id: u64, fields: TaskFields, board: &str) -> Self {
        Task {
            id,
            name: fields.name,
            story: fields.story,
            status: TaskStatus::DefiningDetails,
            assignee: fields.assignee,
            start_date: fields.start_date,
            end_date: fields.end_date,
            priority: fields.priority,
            board: board.to_string(),
        }
    }

    /// Replace every editable field. `id` and `board` are kept.
    pub fn apply(&mut self, fields: TaskFields, status: TaskStatus) {
        self.name = fields.name;
        self.story = fields.story;
        self.assignee = fields.assignee;
        self.start_date = fields.start_date;
        self.end_date = fields.end_date;
        self.priority = fields.priority;
        self.status = status;
    }
}

/// Next task id: the creation timestamp in milliseconds, bumped past any
/// existing id so ids stay unique and increasing.
pub fn next_task_id(existing: &[Task], now_ms: u64) -> Result<u64> {
    let max = existing.iter().map(|t| t.id).max().unwrap_or(0);
    let after = max.checked_add(1).ok_or(Error::IdsExhausted("task"))?;
    Ok(now_ms.max(after))
}

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

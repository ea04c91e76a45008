//! Enumerations and field types for tasks and defects.
//!
//! Every enum persists as its display label (`"In Development"`, `"E2E"`, ...)
//! so the JSON documents stay byte-compatible with what the board has always
//! written. On the command line the same values are spelled in kebab-case.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Workflow position of a task on the board, in column order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskStatus {
    #[serde(rename = "Defining Details")]
    DefiningDetails,
    #[serde(rename = "In Development")]
    InDevelopment,
    #[serde(rename = "In Functional Test")]
    InFunctionalTest,
    #[serde(rename = "E2E")]
    #[value(name = "e2e")]
    E2e,
    #[serde(rename = "Waiting to Deploy")]
    WaitingToDeploy,
    #[serde(rename = "Complete")]
    Complete,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::DefiningDetails,
        TaskStatus::InDevelopment,
        TaskStatus::InFunctionalTest,
        TaskStatus::E2e,
        TaskStatus::WaitingToDeploy,
        TaskStatus::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::DefiningDetails => "Defining Details",
            TaskStatus::InDevelopment => "In Development",
            TaskStatus::InFunctionalTest => "In Functional Test",
            TaskStatus::E2e => "E2E",
            TaskStatus::WaitingToDeploy => "Waiting to Deploy",
            TaskStatus::Complete => "Complete",
        }
    }

    /// Column index on the kanban board.
    pub fn column(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The previous workflow stage, if any.
    pub fn prev(self) -> Option<TaskStatus> {
        self.column().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// The next workflow stage, if any.
    pub fn next(self) -> Option<TaskStatus> {
        Self::ALL.get(self.column() + 1).copied()
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }
}

/// Severity scale shared by a defect's `severity` and `priority` fields.
/// The two are chosen independently.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Defect lifecycle state. Any value may follow any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefectStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
    Verified,
    Closed,
    Reopened,
}

impl DefectStatus {
    pub fn label(self) -> &'static str {
        match self {
            DefectStatus::Open => "Open",
            DefectStatus::InProgress => "In Progress",
            DefectStatus::Fixed => "Fixed",
            DefectStatus::Verified => "Verified",
            DefectStatus::Closed => "Closed",
            DefectStatus::Reopened => "Reopened",
        }
    }
}

/// Environment a defect was observed in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Staging,
    Production,
}

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Environment::Development => "Development",
            Environment::Testing => "Testing",
            Environment::Staging => "Staging",
            Environment::Production => "Production",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(TaskStatus, TaskPriority, Severity, DefectStatus, Environment);

/// Status filter on a board: everything, or a single column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

impl From<Option<TaskStatus>> for StatusFilter {
    fn from(value: Option<TaskStatus>) -> Self {
        value.map_or(StatusFilter::All, StatusFilter::Only)
    }
}

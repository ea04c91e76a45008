//! Aggregation over task and defect snapshots.
//!
//! Everything here is a pure function of its input slice and never fails;
//! rates over an empty set are 0.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::defect::Defect;
use crate::fields::{DefectStatus, Severity, TaskPriority, TaskStatus};
use crate::task::Task;

/// Counts derived from a task snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub by_status: BTreeMap<TaskStatus, usize>,
    pub by_priority: BTreeMap<TaskPriority, usize>,
    /// Keyed by the literal assignee string: "Kiran" and "kiran " are
    /// separate buckets.
    pub by_assignee: BTreeMap<String, usize>,
}

/// `round(part / whole * 100)`, or 0 for an empty whole.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

pub fn compute_stats(tasks: &[Task]) -> Stats {
    let mut by_status = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    let mut by_assignee: BTreeMap<String, usize> = BTreeMap::new();

    for task in tasks {
        *by_status.entry(task.status).or_insert(0) += 1;
        *by_priority.entry(task.priority).or_insert(0) += 1;
        *by_assignee.entry(task.assignee.clone()).or_insert(0) += 1;
    }

    Stats {
        total: tasks.len(),
        completed: by_status.get(&TaskStatus::Complete).copied().unwrap_or(0),
        in_progress: by_status.get(&TaskStatus::InDevelopment).copied().unwrap_or(0),
        by_status,
        by_priority,
        by_assignee,
    }
}

impl Stats {
    pub fn completion_rate(&self) -> u32 {
        percent(self.completed, self.total)
    }

    pub fn status_count(&self, status: TaskStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn priority_count(&self, priority: TaskPriority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }

    /// Share of all tasks carrying `priority`, in percent.
    pub fn priority_share(&self, priority: TaskPriority) -> u32 {
        percent(self.priority_count(priority), self.total)
    }
}

/// One assignee's row in the team performance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPerformance {
    pub assignee: String,
    pub total: usize,
    pub completed: usize,
    pub success_rate: u32,
}

/// Per-assignee totals, completions and success rate, in assignee order.
pub fn team_performance(tasks: &[Task]) -> Vec<MemberPerformance> {
    let mut rows: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for task in tasks {
        let row = rows.entry(task.assignee.as_str()).or_insert((0, 0));
        row.0 += 1;
        if task.status == TaskStatus::Complete {
            row.1 += 1;
        }
    }
    rows.into_iter()
        .map(|(assignee, (total, completed))| MemberPerformance {
            assignee: assignee.to_string(),
            total,
            completed,
            success_rate: percent(completed, total),
        })
        .collect()
}

/// The first `limit` tasks in stored order.
pub fn recent_tasks(tasks: &[Task], limit: usize) -> &[Task] {
    &tasks[..tasks.len().min(limit)]
}

/// Headline counters for the defect table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub fixed: usize,
    pub closed: usize,
    pub critical: usize,
    pub high: usize,
}

impl DefectStats {
    pub fn compute(defects: &[Defect]) -> Self {
        let status = |s: DefectStatus| defects.iter().filter(|d| d.status == s).count();
        let severity = |s: Severity| defects.iter().filter(|d| d.severity == s).count();
        DefectStats {
            total: defects.len(),
            open: status(DefectStatus::Open),
            in_progress: status(DefectStatus::InProgress),
            fixed: status(DefectStatus::Fixed),
            closed: status(DefectStatus::Closed),
            critical: severity(Severity::Critical),
            high: severity(Severity::High),
        }
    }
}

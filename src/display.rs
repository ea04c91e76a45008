//! Plain-text rendering for the command line.

use crate::defect::Defect;
use crate::fields::{TaskPriority, TaskStatus};
use crate::roster::Team;
use crate::stats::{recent_tasks, team_performance, DefectStats, Stats};
use crate::task::Task;

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Initials for an avatar badge: "Manoj Naidu" -> "MN".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// Render board tasks as a table.
pub fn task_table(tasks: &[&Task]) -> String {
    let mut out = format!(
        "{:<14} {:<19} {:<7} {:<14} {:<10} {:<10} {}\n",
        "ID", "Status", "Pri", "Assignee", "Start", "End", "Story"
    );
    for t in tasks {
        out.push_str(&format!(
            "{:<14} {:<19} {:<7} {:<14} {:<10} {:<10} {}\n",
            t.id,
            t.status.label(),
            t.priority.label(),
            truncate(&t.assignee, 14),
            t.start_date.to_string(),
            t.end_date.to_string(),
            t.story
        ));
    }
    out
}

/// Full detail view of one task.
pub fn task_detail(t: &Task) -> String {
    format!(
        "Task #{}: {}\n\nStatus:    {}\nPriority:  {}\nAssignee:  {} ({})\nReporter:  {}\nStart:     {}\nEnd:       {}\nBoard:     {}\n",
        t.id,
        t.story,
        t.status,
        t.priority,
        t.assignee,
        initials(&t.assignee),
        t.name,
        t.start_date,
        t.end_date,
        dash_if_empty(&t.board)
    )
}

pub fn board_header(team: &Team) -> String {
    format!("{} Board\nTeam: {}\n", team.name, team.members.join(", "))
}

/// Render the defect table.
pub fn defect_table(defects: &[Defect]) -> String {
    let mut out = format!(
        "{:<18} {:<9} {:<9} {:<12} {:<12} {:<14} {}\n",
        "ID", "Severity", "Priority", "Status", "Environment", "Assignee", "Title"
    );
    for d in defects {
        out.push_str(&format!(
            "{:<18} {:<9} {:<9} {:<12} {:<12} {:<14} {}\n",
            d.id,
            d.severity.label(),
            d.priority.label(),
            d.status.label(),
            d.environment.label(),
            truncate(dash_if_empty(&d.assignee), 14),
            d.title
        ));
    }
    out
}

pub fn defect_detail(d: &Defect) -> String {
    let date = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "{}: {}\n\n{}\n\nSeverity:     {}\nPriority:     {}\nStatus:       {}\nEnvironment:  {}\nModule:       {}\nAssignee:     {}\nReported by:  {}\nReported:     {}\nResolved:     {}\n",
        d.id,
        d.title,
        dash_if_empty(&d.description),
        d.severity,
        d.priority,
        d.status,
        d.environment,
        dash_if_empty(&d.module),
        dash_if_empty(&d.assignee),
        dash_if_empty(&d.reported_by),
        date(d.reported_date),
        date(d.resolved_date)
    )
}

pub fn defect_stats(s: &DefectStats) -> String {
    format!(
        "Total: {}  Open: {}  In Progress: {}  Fixed: {}  Closed: {}  Critical: {}  High: {}\n",
        s.total, s.open, s.in_progress, s.fixed, s.closed, s.critical, s.high
    )
}

fn bar(count: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return String::new();
    }
    let filled = (count * width + total / 2) / total;
    "█".repeat(filled)
}

/// Text dashboard: key metrics, distributions, team performance, recent tasks.
pub fn dashboard(tasks: &[Task], stats: &Stats, recent_limit: usize) -> String {
    let mut out = String::from("Project Dashboard\n\n");
    out.push_str(&format!(
        "Total Tasks: {}  Completed: {}  In Progress: {}  Completion Rate: {}%\n\n",
        stats.total,
        stats.completed,
        stats.in_progress,
        stats.completion_rate()
    ));

    out.push_str("Tasks by Status\n");
    for status in TaskStatus::ALL {
        let count = stats.status_count(status);
        if count > 0 {
            out.push_str(&format!(
                "  {:<19} {:>4} {}\n",
                status.label(),
                count,
                bar(count, stats.total, 30)
            ));
        }
    }

    out.push_str("\nTasks by Priority\n");
    for priority in TaskPriority::ALL {
        let count = stats.priority_count(priority);
        if count > 0 {
            out.push_str(&format!(
                "  {:<7} {:>4} {:>4}%\n",
                priority.label(),
                count,
                stats.priority_share(priority)
            ));
        }
    }

    out.push_str("\nTeam Performance\n");
    for row in team_performance(tasks) {
        out.push_str(&format!(
            "  [{:<2}] {:<16} total {:>3}  completed {:>3}  success {:>3}%\n",
            initials(&row.assignee),
            truncate(&row.assignee, 16),
            row.total,
            row.completed,
            row.success_rate
        ));
    }

    out.push_str("\nRecent Tasks\n");
    for t in recent_tasks(tasks, recent_limit) {
        out.push_str(&format!(
            "  {} - {} • {} • {} Priority (ends {})\n",
            t.story, t.assignee, t.status, t.priority, t.end_date
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use chrono::NaiveDate;

    #[test]
    fn truncate_and_initials() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long assignee", 6), "a lon…");
        assert_eq!(initials("Manoj Naidu"), "MN");
        assert_eq!(initials("sravani"), "S");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn bars_scale_to_width() {
        assert_eq!(bar(0, 0, 10), "");
        assert_eq!(bar(5, 10, 10).chars().count(), 5);
        assert_eq!(bar(10, 10, 10).chars().count(), 10);
    }

    #[test]
    fn dashboard_lists_only_populated_buckets() {
        let task = Task {
            id: 1,
            name: "n".into(),
            story: "Fix login bug".into(),
            status: TaskStatus::Complete,
            assignee: "Sravani".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            priority: TaskPriority::High,
            board: "mav-cds".into(),
        };
        let tasks = vec![task];
        let text = dashboard(&tasks, &compute_stats(&tasks), 5);
        assert!(text.contains("Completion Rate: 100%"));
        assert!(text.contains("Complete"));
        assert!(!text.contains("E2E"));
        assert!(text.contains("Fix login bug - Sravani"));
    }

    #[test]
    fn empty_dashboard_renders() {
        let text = dashboard(&[], &compute_stats(&[]), 5);
        assert!(text.contains("Total Tasks: 0"));
        assert!(text.contains("Completion Rate: 0%"));
    }
}

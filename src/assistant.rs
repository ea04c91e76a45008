//! Rule-based task assistant.
//!
//! A query is lower-cased once and run through an ordered rule table. Each
//! rule is a plain substring test; the first rule that answers wins. There is
//! no state between queries: the reply is a pure function of the query and
//! the task snapshot.
//!
//! A list rule whose match set is empty answers with its "no tasks" sentence,
//! unless the query also asks for counts: then the statistics rule answers
//! instead. So "how many tasks are complete" over a board with nothing
//! complete yields the statistics block, while "is payment api done" still
//! says nothing is complete.

use tracing::debug;

use crate::fields::TaskStatus;
use crate::task::Task;

/// Opening message of a chat session.
pub const GREETING: &str = "Hello! I'm your task assistant. Ask me about tasks, assignments, or project status. Try asking:\n\
• Who is working on [task name]?\n\
• Is [task name] complete?\n\
• Show me all tasks assigned to [person]\n\
• What tasks are in development?";

/// Reply when no rule matched.
pub const HELP: &str = "I'm not sure about that. Try asking:\n\
• 'Who is working on [task name]?'\n\
• 'Is [task name] complete?'\n\
• 'Show me all tasks'\n\
• 'How many tasks are complete?'\n\
• 'What tasks are in development?'";

/// Result of trying one rule.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Answer(String),
    /// Triggered, but nothing to list.
    Empty(&'static str),
    Pass,
}

struct Rule {
    name: &'static str,
    apply: fn(&str, &[Task]) -> Outcome,
}

const RULES: &[Rule] = &[
    Rule { name: "completed", apply: completed },
    Rule { name: "assignee", apply: assignee },
    Rule { name: "task-detail", apply: task_detail },
    Rule { name: "in-development", apply: in_development },
    Rule { name: "in-testing", apply: in_testing },
    Rule { name: "waiting-to-deploy", apply: waiting_to_deploy },
    Rule { name: "all-tasks", apply: all_tasks },
    Rule { name: "statistics", apply: statistics },
];

/// Answer a free-text question about `tasks`.
pub fn resolve(query: &str, tasks: &[Task]) -> String {
    let q = query.to_lowercase();

    for rule in RULES {
        match (rule.apply)(&q, tasks) {
            Outcome::Answer(reply) => {
                debug!(rule = rule.name, "assistant rule answered");
                return reply;
            }
            Outcome::Empty(sentence) => {
                debug!(rule = rule.name, "assistant rule matched nothing");
                // Only the statistics rule may still take over an empty list.
                if let Outcome::Answer(reply) = statistics(&q, tasks) {
                    return reply;
                }
                return sentence.to_string();
            }
            Outcome::Pass => {}
        }
    }

    HELP.to_string()
}

fn mentions(q: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|t| q.contains(t))
}

/// Header line plus one bullet per task, or `empty` when there are none.
fn list<'a>(
    matches: impl Iterator<Item = &'a Task>,
    header: &str,
    empty: &'static str,
    bullet: impl Fn(&Task) -> String,
) -> Outcome {
    let lines: Vec<String> = matches.map(|t| format!("• {}", bullet(t))).collect();
    if lines.is_empty() {
        return Outcome::Empty(empty);
    }
    Outcome::Answer(format!("{header}\n{}", lines.join("\n")))
}

fn with_status(tasks: &[Task], status: TaskStatus) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |t| t.status == status)
}

fn completed(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["complete", "finished", "done"]) {
        return Outcome::Pass;
    }
    list(
        with_status(tasks, TaskStatus::Complete),
        "✅ Completed tasks:",
        "No tasks are marked as complete yet.",
        |t| format!("{} (by {})", t.story, t.assignee),
    )
}

fn assignee(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["assigned to", "working on"]) {
        return Outcome::Pass;
    }
    let Some(person) = tasks.iter().find(|t| q.contains(&t.assignee.to_lowercase())) else {
        return Outcome::Answer(
            "I couldn't find that person in the system. Please check the name.".to_string(),
        );
    };
    let lines: Vec<String> = tasks
        .iter()
        .filter(|t| t.assignee == person.assignee)
        .map(|t| format!("• {} [{}]", t.story, t.status))
        .collect();
    Outcome::Answer(format!("📋 {} is working on:\n{}", person.assignee, lines.join("\n")))
}

fn task_detail(q: &str, tasks: &[Task]) -> Outcome {
    let Some(task) = tasks.iter().find(|t| q.contains(&t.story.to_lowercase())) else {
        return Outcome::Pass;
    };
    Outcome::Answer(format!(
        "📌 Task: {}\n👤 Assigned to: {}\n📊 Status: {}\n🎯 Priority: {}\n📅 Start: {}\n📅 End: {}",
        task.story, task.assignee, task.status, task.priority, task.start_date, task.end_date
    ))
}

fn in_development(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["in development", "development"]) {
        return Outcome::Pass;
    }
    list(
        with_status(tasks, TaskStatus::InDevelopment),
        "🔨 Tasks in development:",
        "No tasks are currently in development.",
        |t| format!("{} ({})", t.story, t.assignee),
    )
}

fn in_testing(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["testing", "test"]) {
        return Outcome::Pass;
    }
    list(
        tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::InFunctionalTest | TaskStatus::E2e)),
        "🧪 Tasks in testing:",
        "No tasks are currently in testing.",
        |t| format!("{} [{}] ({})", t.story, t.status, t.assignee),
    )
}

fn waiting_to_deploy(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["deploy", "waiting"]) {
        return Outcome::Pass;
    }
    list(
        with_status(tasks, TaskStatus::WaitingToDeploy),
        "🚀 Tasks waiting to deploy:",
        "No tasks are waiting to deploy.",
        |t| format!("{} ({})", t.story, t.assignee),
    )
}

fn all_tasks(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["all tasks", "show all"]) {
        return Outcome::Pass;
    }
    list(
        tasks.iter(),
        &format!("📊 All tasks ({} total):", tasks.len()),
        "No tasks found in the system.",
        |t| format!("{} - {} ({})", t.story, t.status, t.assignee),
    )
}

fn statistics(q: &str, tasks: &[Task]) -> Outcome {
    if !mentions(q, &["how many", "count"]) {
        return Outcome::Pass;
    }
    let count = |f: &dyn Fn(&Task) -> bool| tasks.iter().filter(|&t| f(t)).count();
    Outcome::Answer(format!(
        "📊 Task Statistics:\n• Total tasks: {}\n• Completed: {}\n• In Development: {}\n• In Testing: {}\n• Waiting to Deploy: {}",
        tasks.len(),
        count(&|t: &Task| t.status == TaskStatus::Complete),
        count(&|t: &Task| t.status == TaskStatus::InDevelopment),
        count(&|t: &Task| t.status.label().contains("Test") || t.status == TaskStatus::E2e),
        count(&|t: &Task| t.status == TaskStatus::WaitingToDeploy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskPriority;
    use chrono::NaiveDate;

    fn task(story: &str, assignee: &str, status: TaskStatus) -> Task {
        Task {
            id: 1,
            name: "Reporter".into(),
            story: story.into(),
            status,
            assignee: assignee.into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            priority: TaskPriority::High,
            board: "mav-cds".into(),
        }
    }

    fn board() -> Vec<Task> {
        vec![
            task("Fix login bug", "Sravani", TaskStatus::Complete),
            task("Payment API", "Kiran", TaskStatus::InDevelopment),
            task("Search page", "Kiran", TaskStatus::E2e),
            task("Audit log", "Ravi", TaskStatus::InFunctionalTest),
            task("Release notes", "Priya", TaskStatus::WaitingToDeploy),
        ]
    }

    #[test]
    fn completed_query_lists_the_completed_task() {
        let tasks = vec![task("Fix login bug", "Sravani", TaskStatus::Complete)];
        let reply = resolve("is fix login bug complete", &tasks);
        assert_eq!(reply, "✅ Completed tasks:\n• Fix login bug (by Sravani)");
    }

    #[test]
    fn completion_rule_beats_statistics() {
        let reply = resolve("how many tasks are complete", &board());
        assert!(reply.starts_with("✅ Completed tasks:"));
        assert!(!reply.contains("Task Statistics"));
    }

    #[test]
    fn empty_board_statistics_are_zero() {
        let reply = resolve("how many tasks are complete", &[]);
        assert_eq!(
            reply,
            "📊 Task Statistics:\n• Total tasks: 0\n• Completed: 0\n• In Development: 0\n• In Testing: 0\n• Waiting to Deploy: 0"
        );
    }

    #[test]
    fn empty_list_rule_falls_back_to_its_sentence() {
        assert_eq!(resolve("anything done?", &[]), "No tasks are marked as complete yet.");
        let tasks = vec![task("Fix login bug", "Sravani", TaskStatus::Complete)];
        assert_eq!(resolve("what is waiting", &tasks), "No tasks are waiting to deploy.");
    }

    #[test]
    fn empty_completion_rule_still_wins_over_later_rules() {
        let tasks = vec![task("Payment API", "Kiran", TaskStatus::InDevelopment)];
        assert_eq!(resolve("is payment api done", &tasks), "No tasks are marked as complete yet.");
        assert_eq!(
            resolve("is it done yet or still in development", &tasks),
            "No tasks are marked as complete yet."
        );
    }

    #[test]
    fn empty_list_rule_yields_to_counts_only() {
        let tasks = vec![task("Payment API", "Kiran", TaskStatus::InDevelopment)];
        let reply = resolve("how many are waiting to deploy", &tasks);
        assert!(reply.starts_with("📊 Task Statistics:"));
        assert!(reply.contains("• In Development: 1"));
    }

    #[test]
    fn assignee_query_lists_all_of_their_tasks() {
        let reply = resolve("What is Kiran working on?", &board());
        assert_eq!(
            reply,
            "📋 Kiran is working on:\n• Payment API [In Development]\n• Search page [E2E]"
        );
    }

    #[test]
    fn unknown_assignee_is_reported_not_skipped() {
        let reply = resolve("tasks assigned to nobody in particular", &board());
        assert_eq!(reply, "I couldn't find that person in the system. Please check the name.");
    }

    #[test]
    fn story_match_returns_task_detail() {
        let reply = resolve("tell me about the payment api", &board());
        assert_eq!(
            reply,
            "📌 Task: Payment API\n👤 Assigned to: Kiran\n📊 Status: In Development\n🎯 Priority: High\n📅 Start: 2024-01-01\n📅 End: 2024-01-10"
        );
    }

    #[test]
    fn story_match_beats_status_keywords() {
        // "search page" is a story; "test" would otherwise trigger the testing rule.
        let reply = resolve("test the search page", &board());
        assert!(reply.starts_with("📌 Task: Search page"));
    }

    #[test]
    fn status_rules() {
        let tasks = board();
        assert_eq!(resolve("what is in development", &tasks), "🔨 Tasks in development:\n• Payment API (Kiran)");
        assert_eq!(
            resolve("anything in testing?", &tasks),
            "🧪 Tasks in testing:\n• Search page [E2E] (Kiran)\n• Audit log [In Functional Test] (Ravi)"
        );
        assert_eq!(resolve("ready to deploy?", &tasks), "🚀 Tasks waiting to deploy:\n• Release notes (Priya)");
    }

    #[test]
    fn all_tasks_and_statistics() {
        let tasks = board();
        let all = resolve("show all", &tasks);
        assert!(all.starts_with("📊 All tasks (5 total):\n"));
        assert_eq!(all.lines().count(), 6);

        let stats = resolve("count please", &tasks);
        assert!(stats.contains("• Total tasks: 5"));
        assert!(stats.contains("• Completed: 1"));
        assert!(stats.contains("• In Testing: 2"));
        assert!(stats.contains("• Waiting to Deploy: 1"));
    }

    #[test]
    fn unmatched_queries_get_help() {
        assert_eq!(resolve("hello there", &board()), HELP);
        assert_eq!(resolve("", &[]), HELP);
    }

    #[test]
    fn resolution_is_deterministic() {
        let tasks = board();
        for q in ["how many", "who is working on audit log", "xyz", "show all tasks"] {
            assert_eq!(resolve(q, &tasks), resolve(q, &tasks));
        }
    }
}

//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one handler. Handlers return `Result` and leave
//! printing the error and choosing the exit code to `main`.

use std::io::{self, BufRead, Write};

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::assistant::{self, GREETING};
use crate::board::{Board, TaskFilter};
use crate::cli::Cli;
use crate::config::Config;
use crate::confirm::{AssumeYes, Confirm, StdinPrompt};
use crate::dates::parse_date_input;
use crate::defect::{DefectDraft, DefectTable};
use crate::display;
use crate::error::{Error, Result};
use crate::fields::{DefectStatus, Environment, Severity, TaskPriority, TaskStatus};
use crate::roster::TEAMS;
use crate::stats::compute_stats;
use crate::store::{KeyValueStore, RecordStore};
use crate::task::{now_millis, TaskDraft};

#[derive(Subcommand)]
pub enum Commands {
    /// List the team boards and their rosters.
    Boards,

    /// Work with one team's task board.
    Board {
        /// Board id: mav-cds | mavcvs.
        board: String,
        #[command(subcommand)]
        action: BoardAction,
    },

    /// Show the project dashboard over every task.
    Dashboard {
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask the task assistant. Without a question, start a chat session.
    Chat {
        /// Question to answer once, e.g. "what is Kiran working on".
        query: Vec<String>,
    },

    /// Manage the defect list.
    Defects {
        #[command(subcommand)]
        action: DefectAction,
    },

    /// Launch the interactive terminal interface.
    Ui {
        /// Board to open first.
        #[arg(long, default_value = "mav-cds")]
        board: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List the board's tasks.
    List {
        /// Only tasks in this status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Case-insensitive text to find in the story or name.
        #[arg(long, default_value = "")]
        search: String,
        /// Group the tasks by workflow column.
        #[arg(long)]
        columns: bool,
    },

    /// Show one task.
    View { id: u64 },

    /// Add a task. It starts in Defining Details.
    Add {
        #[arg(long)]
        story: String,
        /// Team member the task is assigned to.
        #[arg(long)]
        assignee: String,
        /// Name of the person raising the task.
        #[arg(long)]
        name: String,
        /// Start date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        start: String,
        /// End date, same formats as --start.
        #[arg(long)]
        end: String,
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
    },

    /// Edit a task. Unspecified fields keep their value.
    Update {
        id: u64,
        #[arg(long)]
        story: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<TaskPriority>,
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
    },

    /// Move a task to another workflow column.
    Move {
        id: u64,
        #[arg(value_enum)]
        status: TaskStatus,
    },

    /// Delete a task.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DefectAction {
    /// List all defects with their summary counts.
    List,

    /// Show one defect.
    View { id: String },

    /// Print the defect summary counts.
    Stats,

    /// Report a defect. Only the title is required.
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: DefectFields,
    },

    /// Replace a defect's fields. Unspecified fields keep their value.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: DefectFields,
    },

    /// Delete a defect.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(clap::Args, Default)]
pub struct DefectFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum)]
    severity: Option<Severity>,
    #[arg(long, value_enum)]
    priority: Option<Severity>,
    #[arg(long, value_enum)]
    status: Option<DefectStatus>,
    #[arg(long, value_enum)]
    environment: Option<Environment>,
    #[arg(long)]
    assignee: Option<String>,
    #[arg(long)]
    reported_by: Option<String>,
    /// Reported date: YYYY-MM-DD, "today", "yesterday", ...
    #[arg(long)]
    reported: Option<String>,
    /// Resolved date, same formats as --reported.
    #[arg(long)]
    resolved: Option<String>,
    #[arg(long)]
    module: Option<String>,
}

impl DefectFields {
    fn apply_to(self, draft: &mut DefectDraft) -> Result<()> {
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.severity {
            draft.severity = v;
        }
        if let Some(v) = self.priority {
            draft.priority = v;
        }
        if let Some(v) = self.status {
            draft.status = v;
        }
        if let Some(v) = self.environment {
            draft.environment = v;
        }
        if let Some(v) = self.assignee {
            draft.assignee = v;
        }
        if let Some(v) = self.reported_by {
            draft.reported_by = v;
        }
        if let Some(v) = self.reported {
            draft.reported_date = Some(parse_date_input(&v)?);
        }
        if let Some(v) = self.resolved {
            draft.resolved_date = Some(parse_date_input(&v)?);
        }
        if let Some(v) = self.module {
            draft.module = v;
        }
        Ok(())
    }
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt)
    }
}

/// List every board with its roster and task count.
pub fn cmd_boards<S: KeyValueStore>(store: &RecordStore<S>) -> Result<()> {
    for team in TEAMS {
        let board = Board::open(store, team.id)?;
        println!(
            "{:<10} {:<10} {:>3} tasks  {}",
            team.id,
            team.name,
            board.tasks.len(),
            team.members.join(", ")
        );
    }
    Ok(())
}

pub fn cmd_board<S: KeyValueStore>(
    store: &RecordStore<S>,
    board_id: &str,
    action: BoardAction,
) -> Result<()> {
    let mut board = Board::open(store, board_id)?;
    match action {
        BoardAction::List { status, search, columns } => {
            let filter = TaskFilter { status: status.into(), search };
            print!("{}", display::board_header(board.team));
            println!();
            if columns {
                for (status, tasks) in TaskStatus::ALL.iter().zip(board.columns(&filter)) {
                    println!("{} ({})", status, tasks.len());
                    for t in tasks {
                        println!("  #{} {} [{}] {}", t.id, t.story, t.priority, t.assignee);
                    }
                }
            } else {
                let tasks = board.filtered(&filter);
                if tasks.is_empty() {
                    println!("No tasks.");
                } else {
                    print!("{}", display::task_table(&tasks));
                }
            }
        }
        BoardAction::View { id } => {
            let task = board.get(id).ok_or(Error::TaskNotFound(id))?;
            print!("{}", display::task_detail(task));
        }
        BoardAction::Add { story, assignee, name, start, end, priority } => {
            let draft = TaskDraft {
                story,
                name,
                assignee,
                start_date: Some(parse_date_input(&start)?),
                end_date: Some(parse_date_input(&end)?),
                priority,
            };
            let task = board.create(store, &draft, now_millis())?;
            println!("Added task {} to {}", task.id, board_id);
        }
        BoardAction::Update { id, story, assignee, name, start, end, priority, status } => {
            let task = board.get(id).ok_or(Error::TaskNotFound(id))?;
            let status = status.unwrap_or(task.status);
            let mut draft = TaskDraft::from_task(task);
            if let Some(v) = story {
                draft.story = v;
            }
            if let Some(v) = assignee {
                draft.assignee = v;
            }
            if let Some(v) = name {
                draft.name = v;
            }
            if let Some(v) = start {
                draft.start_date = Some(parse_date_input(&v)?);
            }
            if let Some(v) = end {
                draft.end_date = Some(parse_date_input(&v)?);
            }
            if priority.is_some() {
                draft.priority = priority;
            }
            board.update(store, id, &draft, status)?;
            println!("Updated task {}", id);
        }
        BoardAction::Move { id, status } => {
            board.move_task(store, id, status)?;
            println!("Moved task {} to {}", id, status);
        }
        BoardAction::Delete { id, yes } => {
            if board.delete(store, id, confirmer(yes).as_mut())? {
                println!("Deleted task {}", id);
            } else {
                println!("Kept task {}", id);
            }
        }
    }
    Ok(())
}

pub fn cmd_dashboard<S: KeyValueStore>(
    store: &RecordStore<S>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let tasks = store.load_tasks();
    let stats = compute_stats(&tasks);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", display::dashboard(&tasks, &stats, config.dashboard.recent_limit));
    }
    Ok(())
}

/// Answer one question, or run a read-answer loop on stdin.
pub fn cmd_chat<S: KeyValueStore>(
    store: &RecordStore<S>,
    config: &Config,
    query: Vec<String>,
) -> Result<()> {
    if !query.is_empty() {
        println!("{}", assistant::resolve(&query.join(" "), &store.load_tasks()));
        return Ok(());
    }

    println!("{GREETING}\n");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        // Re-read so edits made elsewhere during the session are seen.
        let tasks = store.load_tasks();
        debug!(query = line, tasks = tasks.len(), "chat query");
        std::thread::sleep(config.chat.typing_delay());
        println!("{}\n", assistant::resolve(line, &tasks));
    }
    Ok(())
}

pub fn cmd_defects<S: KeyValueStore>(store: &RecordStore<S>, action: DefectAction) -> Result<()> {
    let mut table = DefectTable::load(store);
    match action {
        DefectAction::List => {
            print!("{}", display::defect_stats(&table.stats()));
            println!();
            if table.defects.is_empty() {
                println!("No defects.");
            } else {
                print!("{}", display::defect_table(&table.defects));
            }
        }
        DefectAction::View { id } => {
            let defect = table.get(&id).ok_or_else(|| Error::DefectNotFound(id.clone()))?;
            print!("{}", display::defect_detail(defect));
        }
        DefectAction::Stats => print!("{}", display::defect_stats(&table.stats())),
        DefectAction::Add { title, fields } => {
            let mut draft = DefectDraft { title, ..Default::default() };
            fields.apply_to(&mut draft)?;
            let defect = table.create(store, draft, now_millis())?;
            println!("Added defect {}", defect.id);
        }
        DefectAction::Update { id, title, fields } => {
            let current = table.get(&id).ok_or_else(|| Error::DefectNotFound(id.clone()))?;
            let mut draft = DefectDraft::from_defect(current);
            if let Some(v) = title {
                draft.title = v;
            }
            fields.apply_to(&mut draft)?;
            table.update(store, &id, draft)?;
            println!("Updated defect {}", id);
        }
        DefectAction::Delete { id, yes } => {
            if table.delete(store, &id, confirmer(yes).as_mut())? {
                println!("Deleted defect {}", id);
            } else {
                println!("Kept defect {}", id);
            }
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

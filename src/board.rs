//! Team board: the slice of the task collection whose assignees are on one
//! team's roster, and the operations the board offers on it.
//!
//! Every mutation edits the in-memory slice and hands the whole slice back to
//! the record store, which merges it into the full collection.

use tracing::{debug, info};

use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::fields::{StatusFilter, TaskStatus};
use crate::roster::{find_team, Team};
use crate::store::{KeyValueStore, RecordStore};
use crate::task::{next_task_id, Task, TaskDraft, TaskFields};

/// Filter applied to the board listing.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring of the story or the reporter name.
    pub search: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.search.to_lowercase();
        self.status.matches(task.status)
            && (task.story.to_lowercase().contains(&needle)
                || task.name.to_lowercase().contains(&needle))
    }
}

#[derive(Debug)]
pub struct Board {
    pub team: &'static Team,
    pub tasks: Vec<Task>,
}

impl Board {
    /// Open a board by id, loading the tasks assigned to its team.
    pub fn open<S: KeyValueStore>(store: &RecordStore<S>, board_id: &str) -> Result<Self> {
        let team = find_team(board_id).ok_or_else(|| Error::BoardNotFound(board_id.to_string()))?;
        let tasks: Vec<Task> = store
            .load_tasks()
            .into_iter()
            .filter(|t| team.has_member(&t.assignee))
            .collect();
        debug!(board = team.id, tasks = tasks.len(), "opened board");
        Ok(Board { team, tasks })
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    fn checked(&self, draft: &TaskDraft) -> Result<TaskFields> {
        let fields = draft.validate()?;
        if !self.team.has_member(&fields.assignee) {
            return Err(Error::NotOnRoster {
                assignee: fields.assignee,
                board: self.team.name.to_string(),
            });
        }
        Ok(fields)
    }

    fn persist<S: KeyValueStore>(&self, store: &RecordStore<S>) -> Result<()> {
        store.save_tasks(&self.tasks, self.team.members)
    }

    /// Tasks matching `filter`, in stored order.
    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Tasks grouped into workflow columns, `Defining Details` first.
    pub fn columns(&self, filter: &TaskFilter) -> [Vec<&Task>; 6] {
        let mut columns: [Vec<&Task>; 6] = Default::default();
        for task in self.filtered(filter) {
            columns[task.status.column()].push(task);
        }
        columns
    }

    /// Add a task in the first workflow column.
    pub fn create<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        draft: &TaskDraft,
        now_ms: u64,
    ) -> Result<&Task> {
        let fields = self.checked(draft)?;
        // Ids must be unique across every board, not just this one.
        let id = next_task_id(&store.load_tasks(), now_ms)?;
        let task = Task::new(id, fields, self.team.id);
        info!(board = self.team.id, id, story = %task.story, "creating task");
        self.tasks.push(task);
        self.persist(store)?;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Replace every editable field of a task.
    pub fn update<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        id: u64,
        draft: &TaskDraft,
        status: TaskStatus,
    ) -> Result<()> {
        let idx = self.position(id)?;
        let fields = self.checked(draft)?;
        self.tasks[idx].apply(fields, status);
        debug!(board = self.team.id, id, "updated task");
        self.persist(store)
    }

    /// Change only the status of a task.
    pub fn move_task<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        id: u64,
        status: TaskStatus,
    ) -> Result<()> {
        let idx = self.position(id)?;
        self.tasks[idx].status = status;
        debug!(board = self.team.id, id, status = %status, "moved task");
        self.persist(store)
    }

    /// Delete after confirmation. Returns `false` when the user declined.
    pub fn delete<S: KeyValueStore>(
        &mut self,
        store: &RecordStore<S>,
        id: u64,
        confirm: &mut dyn Confirm,
    ) -> Result<bool> {
        self.position(id)?;
        if !confirm.confirm("Are you sure you want to delete this task?") {
            debug!(board = self.team.id, id, "task deletion declined");
            return Ok(false);
        }
        self.tasks.retain(|t| t.id != id);
        info!(board = self.team.id, id, "deleted task");
        self.persist(store)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskPriority;
    use crate::store::{MemoryStore, MergePolicy};
    use chrono::NaiveDate;

    fn draft(story: &str, assignee: &str) -> TaskDraft {
        TaskDraft {
            story: story.into(),
            name: "Anil".into(),
            assignee: assignee.into(),
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 9),
            priority: Some(TaskPriority::Medium),
        }
    }

    fn store() -> RecordStore<MemoryStore> {
        RecordStore::new(MemoryStore::default())
    }

    #[test]
    fn unknown_board_is_not_found() {
        assert!(matches!(Board::open(&store(), "nope"), Err(Error::BoardNotFound(id)) if id == "nope"));
    }

    #[test]
    fn boards_are_isolated_by_roster() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let members = cds.team.members;
        for (i, member) in members.iter().enumerate() {
            cds.create(&store, &draft(&format!("story {i}"), member), 100).unwrap();
        }
        assert_eq!(Board::open(&store, "mav-cds").unwrap().tasks.len(), 3);
        assert!(Board::open(&store, "mavcvs").unwrap().tasks.is_empty());
    }

    #[test]
    fn created_tasks_get_unique_ids_and_the_board_id() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let mut cvs = Board::open(&store, "mavcvs").unwrap();
        let a = cds.create(&store, &draft("a", "Kiran"), 100).unwrap().id;
        let b = cvs.create(&store, &draft("b", "Ravi"), 100).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(store.load_tasks().len(), 2);
        assert_eq!(cds.get(a).unwrap().board, "mav-cds");
        assert_eq!(cds.get(a).unwrap().status, TaskStatus::DefiningDetails);
    }

    #[test]
    fn assignee_must_be_on_the_roster() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let err = cds.create(&store, &draft("a", "Ravi"), 1).unwrap_err();
        assert!(matches!(err, Error::NotOnRoster { .. }));
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn update_replaces_fields_and_keeps_id_and_board() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let id = cds.create(&store, &draft("a", "Kiran"), 1).unwrap().id;

        let mut edit = TaskDraft::from_task(cds.get(id).unwrap());
        edit.story = "a, revised".into();
        edit.assignee = "Sravani".into();
        cds.update(&store, id, &edit, TaskStatus::E2e).unwrap();

        let reopened = Board::open(&store, "mav-cds").unwrap();
        let task = reopened.get(id).unwrap();
        assert_eq!(task.story, "a, revised");
        assert_eq!(task.assignee, "Sravani");
        assert_eq!(task.status, TaskStatus::E2e);
        assert_eq!(task.board, "mav-cds");
    }

    #[test]
    fn move_and_unknown_ids() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let id = cds.create(&store, &draft("a", "Kiran"), 1).unwrap().id;
        cds.move_task(&store, id, TaskStatus::Complete).unwrap();
        assert_eq!(store.load_tasks()[0].status, TaskStatus::Complete);
        assert!(matches!(cds.move_task(&store, id + 1, TaskStatus::E2e), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn delete_requires_confirmation() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let id = cds.create(&store, &draft("a", "Kiran"), 1).unwrap().id;

        let mut asked = 0;
        let mut decline = |_: &str| {
            asked += 1;
            false
        };
        assert!(!cds.delete(&store, id, &mut decline).unwrap());
        assert_eq!(asked, 1);
        assert_eq!(store.load_tasks().len(), 1);

        let mut accept = |_: &str| true;
        assert!(cds.delete(&store, id, &mut accept).unwrap());
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn saving_one_board_keeps_the_other() {
        for policy in [MergePolicy::ByMembership, MergePolicy::UpsertById] {
            let store = RecordStore::with_policy(MemoryStore::default(), policy);
            let mut cvs = Board::open(&store, "mavcvs").unwrap();
            cvs.create(&store, &draft("cvs", "Priya"), 1).unwrap();
            let mut cds = Board::open(&store, "mav-cds").unwrap();
            let id = cds.create(&store, &draft("cds", "Kiran"), 1).unwrap().id;
            cds.move_task(&store, id, TaskStatus::E2e).unwrap();

            let cvs_again = Board::open(&store, "mavcvs").unwrap();
            assert_eq!(cvs_again.tasks.len(), 1);
            assert_eq!(cvs_again.tasks[0].story, "cvs");
        }
    }

    #[test]
    fn filter_by_status_and_search() {
        let store = store();
        let mut cds = Board::open(&store, "mav-cds").unwrap();
        let login = cds.create(&store, &draft("Login page", "Kiran"), 1).unwrap().id;
        cds.create(&store, &draft("Logout flow", "Sravani"), 1).unwrap();
        cds.create(&store, &draft("Billing", "Kiran"), 1).unwrap();
        cds.move_task(&store, login, TaskStatus::InDevelopment).unwrap();

        let by_text = TaskFilter { search: "LOG".into(), ..Default::default() };
        assert_eq!(cds.filtered(&by_text).len(), 2);

        let by_name = TaskFilter { search: "anil".into(), ..Default::default() };
        assert_eq!(cds.filtered(&by_name).len(), 3);

        let both = TaskFilter {
            status: StatusFilter::Only(TaskStatus::InDevelopment),
            search: "log".into(),
        };
        let hits = cds.filtered(&both);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].story, "Login page");

        let columns = cds.columns(&TaskFilter::default());
        assert_eq!(columns[0].len(), 2);
        assert_eq!(columns[TaskStatus::InDevelopment.column()].len(), 1);
    }
}

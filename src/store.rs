//! Record store over a key-value backend.
//!
//! Two collections live under two keys: tasks (`jira-tasks`) and defects
//! (`defect-list`). Each is a JSON array written in full on every save.
//! Reads never fail: an absent, unreadable or malformed document is an
//! empty collection, and a single record that does not fit its type is
//! skipped. Skipped task records are written back untouched on the next
//! save, so one bad entry never costs the other records.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::defect::Defect;
use crate::error::Result;
use crate::task::Task;

pub const TASKS_KEY: &str = "jira-tasks";
pub const DEFECTS_KEY: &str = "defect-list";

/// String-keyed document storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic-ish write via temp + rename.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// Process-local storage, used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// How a team-scoped task list is merged back into the full collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Drop every stored task whose assignee is on the saving team, then
    /// append the team's list. A task reassigned off the roster disappears
    /// from every board.
    #[default]
    ByMembership,
    /// Replace stored tasks by id; team membership only decides which stored
    /// tasks the saving team may delete.
    UpsertById,
}

/// Records that parsed, plus the raw entries that did not.
struct Loaded<T> {
    records: Vec<T>,
    unreadable: Vec<Value>,
}

/// Typed access to the two persisted collections.
pub struct RecordStore<S> {
    backend: S,
    policy: MergePolicy,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_policy(backend, MergePolicy::default())
    }

    pub fn with_policy(backend: S, policy: MergePolicy) -> Self {
        RecordStore { backend, policy }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The full task collection, across every board.
    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_collection(TASKS_KEY)
    }

    /// Merge one team's tasks back into the full collection and persist it.
    /// Stored entries that are not readable tasks are carried over as they are.
    pub fn save_tasks(&self, scoped: &[Task], team_members: &[&str]) -> Result<()> {
        let Loaded { records: stored, unreadable } = self.load_records::<Task>(TASKS_KEY);
        let merged = match self.policy {
            MergePolicy::ByMembership => merge_by_membership(stored, scoped, team_members),
            MergePolicy::UpsertById => merge_upsert_by_id(stored, scoped, team_members),
        };
        debug!(
            policy = ?self.policy,
            scoped = scoped.len(),
            total = merged.len(),
            kept_unreadable = unreadable.len(),
            "saving tasks"
        );
        self.save_keeping(TASKS_KEY, &merged, unreadable)
    }

    pub fn load_defects(&self) -> Vec<Defect> {
        self.load_collection(DEFECTS_KEY)
    }

    pub fn save_defects(&self, defects: &[Defect]) -> Result<()> {
        let unreadable = self.load_records::<Defect>(DEFECTS_KEY).unreadable;
        debug!(total = defects.len(), kept_unreadable = unreadable.len(), "saving defects");
        self.save_keeping(DEFECTS_KEY, defects, unreadable)
    }

    /// Write `items` followed by the raw entries that could not be read.
    fn save_keeping<T: Serialize>(&self, key: &str, items: &[T], unreadable: Vec<Value>) -> Result<()> {
        if unreadable.is_empty() {
            return self.save_collection(key, items);
        }
        let mut document = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        document.extend(unreadable);
        self.save_collection(key, &document)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_records(key).records
    }

    /// Parse a document record by record.
    fn load_records<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        let mut loaded = Loaded { records: Vec::new(), unreadable: Vec::new() };
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return loaded,
            Err(e) => {
                warn!(key, error = %e, "error reading collection, treating as empty");
                return loaded;
            }
        };
        if raw.trim().is_empty() {
            return loaded;
        }
        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key, error = %e, "error parsing collection, treating as empty");
                return loaded;
            }
        };
        for (index, entry) in entries.into_iter().enumerate() {
            match T::deserialize(&entry) {
                Ok(record) => loaded.records.push(record),
                Err(e) => {
                    warn!(key, index, error = %e, "skipping unreadable record");
                    loaded.unreadable.push(entry);
                }
            }
        }
        loaded
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let data = serde_json::to_string_pretty(items)?;
        self.backend.set(key, &data)
    }
}

fn merge_by_membership(stored: Vec<Task>, scoped: &[Task], members: &[&str]) -> Vec<Task> {
    let mut merged: Vec<Task> = stored
        .into_iter()
        .filter(|t| !members.contains(&t.assignee.as_str()))
        .collect();
    merged.extend(scoped.iter().cloned());
    merged
}

fn merge_upsert_by_id(stored: Vec<Task>, scoped: &[Task], members: &[&str]) -> Vec<Task> {
    let by_id: HashMap<u64, &Task> = scoped.iter().map(|t| (t.id, t)).collect();
    let mut placed = HashSet::new();
    let mut merged = Vec::with_capacity(stored.len() + scoped.len());
    for task in stored {
        if let Some(&replacement) = by_id.get(&task.id) {
            if placed.insert(task.id) {
                merged.push(replacement.clone());
            }
        } else if !members.contains(&task.assignee.as_str()) {
            merged.push(task);
        }
    }
    merged.extend(scoped.iter().filter(|t| !placed.contains(&t.id)).cloned());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defect::DefectDraft;
    use crate::fields::{TaskPriority, TaskStatus};
    use crate::roster::find_team;
    use chrono::NaiveDate;

    fn task(id: u64, story: &str, assignee: &str) -> Task {
        Task {
            id,
            name: "Reporter".into(),
            story: story.into(),
            status: TaskStatus::DefiningDetails,
            assignee: assignee.into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            priority: TaskPriority::Medium,
            board: "mav-cds".into(),
        }
    }

    fn seeded(policy: MergePolicy) -> RecordStore<MemoryStore> {
        let store = RecordStore::with_policy(MemoryStore::default(), policy);
        let all = vec![
            task(1, "cds one", "Sravani"),
            task(2, "cvs one", "Ravi"),
            task(3, "cds two", "Kiran"),
            task(4, "orphan", "Nobody"),
        ];
        store.save_collection(TASKS_KEY, &all).unwrap();
        store
    }

    #[test]
    fn absent_and_malformed_collections_load_empty() {
        let store = RecordStore::new(MemoryStore::default());
        assert!(store.load_tasks().is_empty());

        store.backend().set(TASKS_KEY, "{not json").unwrap();
        assert!(store.load_tasks().is_empty());

        store.backend().set(DEFECTS_KEY, "").unwrap();
        assert!(store.load_defects().is_empty());

        store.backend().set(DEFECTS_KEY, r#"[{"id": 5}]"#).unwrap();
        assert!(store.load_defects().is_empty());
    }

    #[test]
    fn one_bad_record_costs_nothing_else() {
        let store = RecordStore::new(MemoryStore::default());
        let ravi = serde_json::to_value(task(1, "cvs ok", "Ravi")).unwrap();
        let mut priya = serde_json::to_value(task(2, "cvs odd", "Priya")).unwrap();
        priya["status"] = "Blocked".into();
        let doc = serde_json::to_string(&vec![ravi, priya]).unwrap();
        store.backend().set(TASKS_KEY, &doc).unwrap();

        let loaded = store.load_tasks();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].assignee, "Ravi");

        let cds = find_team("mav-cds").unwrap();
        store.save_tasks(&[task(3, "cds new", "Kiran")], cds.members).unwrap();

        let ids: Vec<u64> = store.load_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let raw = store.backend().get(TASKS_KEY).unwrap().unwrap();
        assert!(raw.contains("Blocked"));
        assert!(raw.contains("cvs odd"));
    }

    #[test]
    fn unreadable_defects_survive_a_save() {
        let store = RecordStore::new(MemoryStore::default());
        store
            .backend()
            .set(DEFECTS_KEY, r#"[{"id": "DEF-1", "title": "ok"}, {"id": "DEF-2", "title": "odd", "severity": "Cosmic"}]"#)
            .unwrap();
        let defects = store.load_defects();
        assert_eq!(defects.len(), 1);

        store.save_defects(&defects).unwrap();
        let raw = store.backend().get(DEFECTS_KEY).unwrap().unwrap();
        assert!(raw.contains("Cosmic"));
        assert_eq!(store.load_defects(), defects);
    }

    #[test]
    fn defects_round_trip_in_order() {
        let store = RecordStore::new(MemoryStore::default());
        let defects: Vec<Defect> = ["b", "a", "c"]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                DefectDraft { title: (*t).into(), ..Default::default() }
                    .build(format!("DEF-{i}"))
                    .unwrap()
            })
            .collect();
        store.save_defects(&defects).unwrap();
        assert_eq!(store.load_defects(), defects);
    }

    #[test]
    fn membership_merge_preserves_other_teams() {
        let store = seeded(MergePolicy::ByMembership);
        let team = find_team("mav-cds").unwrap();
        store.save_tasks(&[task(5, "cds new", "Manoj Naidu")], team.members).unwrap();

        let ids: Vec<u64> = store.load_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 5]);
    }

    #[test]
    fn membership_merge_orphans_reassigned_tasks() {
        let store = seeded(MergePolicy::ByMembership);
        let team = find_team("mav-cds").unwrap();
        let moved = task(1, "cds one", "Someone Else");
        store.save_tasks(&[moved, task(3, "cds two", "Kiran")], team.members).unwrap();

        let all = store.load_tasks();
        // Still persisted, but on no board's roster.
        assert!(all.iter().any(|t| t.id == 1 && t.assignee == "Someone Else"));
        let cds = find_team("mav-cds").unwrap();
        let cvs = find_team("mavcvs").unwrap();
        let orphan = all.iter().find(|t| t.id == 1).unwrap();
        assert!(!cds.has_member(&orphan.assignee));
        assert!(!cvs.has_member(&orphan.assignee));
    }

    #[test]
    fn upsert_merge_replaces_in_place_and_deletes_team_records() {
        let store = seeded(MergePolicy::UpsertById);
        let team = find_team("mav-cds").unwrap();
        let mut edited = task(3, "cds two edited", "Kiran");
        edited.status = TaskStatus::Complete;
        store.save_tasks(&[edited, task(6, "cds new", "Sravani")], team.members).unwrap();

        let all = store.load_tasks();
        let ids: Vec<u64> = all.iter().map(|t| t.id).collect();
        // 1 was dropped by the team, 3 replaced in place, 6 appended.
        assert_eq!(ids, vec![2, 3, 4, 6]);
        assert_eq!(all[1].story, "cds two edited");
    }

    #[test]
    fn both_policies_keep_non_team_records_across_save_and_load() {
        for policy in [MergePolicy::ByMembership, MergePolicy::UpsertById] {
            let store = seeded(policy);
            let team = find_team("mav-cds").unwrap();
            let outside: Vec<Task> = store
                .load_tasks()
                .into_iter()
                .filter(|t| !team.has_member(&t.assignee))
                .collect();
            store.save_tasks(&[], team.members).unwrap();
            let after = store.load_tasks();
            for t in &outside {
                assert!(after.contains(t), "{policy:?} lost task {}", t.id);
            }
        }
    }

    #[test]
    fn file_store_writes_one_document_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let fs_store = FileStore::new(dir.path().join("data"));
        assert_eq!(fs_store.get(TASKS_KEY).unwrap(), None);

        let store = RecordStore::new(fs_store);
        let team = find_team("mavcvs").unwrap();
        store.save_tasks(&[task(9, "cvs", "Priya")], team.members).unwrap();

        let path = store.backend().path_for(TASKS_KEY);
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.load_tasks().len(), 1);

        fs::write(&path, "garbage").unwrap();
        assert!(store.load_tasks().is_empty());
    }
}

//! Task store over a single JSON collection file.

use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Result, StoreError};
use crate::storage::JsonStorage;
use crate::types::{HistoryEntry, Task, TaskPriority, TaskStatus};

/// The on-disk document: all tasks plus the id counter.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskCollection {
    /// Tasks keyed by id.
    pub tasks: BTreeMap<String, Task>,
    /// Source of the next numeric id suffix. Never reused, never skipped.
    pub counter: u64,
}

/// Durable task store.
///
/// Every operation is one load → mutate → save cycle over the whole
/// collection, serialized by a mutex so the counter stays unique and history
/// appends do not interleave under concurrent callers within this process.
pub struct TaskStore {
    storage: JsonStorage<TaskCollection>,
    lock: Mutex<()>,
}

impl TaskStore {
    /// Create a store backed by the given JSON file.
    ///
    /// The file does not need to exist yet; it is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            storage: JsonStorage::new(path.as_ref()),
            lock: Mutex::new(()),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Create a new task with status `pending` and an empty history.
    pub fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Result<Task> {
        let _guard = self.lock.lock();
        let mut collection = self.storage.load()?;

        collection.counter += 1;
        let id = format!("TASK-{:04}", collection.counter);
        let now = Utc::now();

        let task = Task {
            id: id.clone(),
            title: title.into(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            history: Vec::new(),
            escalation_reason: None,
            escalated_at: None,
            extra: serde_json::Map::new(),
        };

        collection.tasks.insert(id.clone(), task.clone());
        self.storage.save(&collection)?;

        log::debug!("Created task {}", id);
        Ok(task)
    }

    /// Look up a task by id.
    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        let _guard = self.lock.lock();
        let collection = self.storage.load()?;
        Ok(collection.tasks.get(id).cloned())
    }

    /// Apply a shallow change set to an existing task.
    ///
    /// The requested delta is appended to the task's history before the
    /// changes are merged. Keys naming known fields overwrite them; unknown
    /// keys are added to the task document. The `id` field is immutable and
    /// attempts to change it are ignored.
    pub fn update(
        &self,
        id: &str,
        changes: serde_json::Map<String, Value>,
    ) -> Result<Task> {
        let _guard = self.lock.lock();
        let mut collection = self.storage.load()?;

        let mut task = match collection.tasks.get(id) {
            Some(task) => task.clone(),
            None => return Err(StoreError::TaskNotFound(id.to_string())),
        };

        let now = Utc::now();
        task.history.push(HistoryEntry {
            timestamp: now,
            changes: changes.clone(),
        });

        let Value::Object(mut doc) = serde_json::to_value(&task)? else {
            return Err(StoreError::InvalidChange(
                "task did not serialize to an object".to_string(),
            ));
        };
        for (key, value) in changes {
            if key == "id" {
                continue;
            }
            doc.insert(key, value);
        }

        let mut merged: Task = serde_json::from_value(Value::Object(doc))
            .map_err(|e| StoreError::InvalidChange(e.to_string()))?;
        // Non-decreasing even if the wall clock stepped backwards.
        merged.updated_at = now.max(task.updated_at);

        collection.tasks.insert(id.to_string(), merged.clone());
        self.storage.save(&collection)?;

        log::debug!("Updated task {}", id);
        Ok(merged)
    }

    /// List tasks, optionally restricted to one status, newest first.
    pub fn list(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let _guard = self.lock.lock();
        let collection = self.storage.load()?;

        let mut tasks: Vec<Task> = collection
            .tasks
            .into_values()
            .filter(|task| status.map_or(true, |s| task.status == s))
            .collect();
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tasks)
    }

    /// Mark a task escalated, recording the reason and the escalation time.
    pub fn escalate(&self, id: &str, reason: impl Into<String>) -> Result<Task> {
        let mut changes = serde_json::Map::new();
        changes.insert(
            "status".to_string(),
            Value::String(TaskStatus::Escalated.as_str().to_string()),
        );
        changes.insert("escalation_reason".to_string(), Value::String(reason.into()));
        changes.insert("escalated_at".to_string(), serde_json::to_value(Utc::now())?);
        self.update(id, changes)
    }

    /// The current id counter (equals the number of successful creates).
    pub fn counter(&self) -> Result<u64> {
        let _guard = self.lock.lock();
        Ok(self.storage.load()?.counter)
    }

    /// Drop every task and reset the counter to zero.
    pub fn reset(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.storage.save(&TaskCollection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> TaskStore {
        TaskStore::new(dir.path().join("tasks.json"))
    }

    #[test]
    fn test_ids_are_monotonic_and_zero_padded() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let a = store.create("First", "", TaskPriority::Medium).unwrap();
        let b = store.create("Second", "", TaskPriority::Low).unwrap();
        let c = store.create("Third", "", TaskPriority::High).unwrap();

        assert_eq!(a.id, "TASK-0001");
        assert_eq!(b.id, "TASK-0002");
        assert_eq!(c.id, "TASK-0003");
        assert_eq!(store.counter().unwrap(), 3);
    }

    #[test]
    fn test_create_starts_pending_with_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let task = store.create("Review", "A review task", TaskPriority::High).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.history.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_update_appends_history_delta() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let task = store.create("Task", "", TaskPriority::Medium).unwrap();

        let mut changes = serde_json::Map::new();
        changes.insert("status".to_string(), serde_json::json!("in_progress"));
        let updated = store.update(&task.id, changes.clone()).unwrap();

        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.history.len(), 1);
        assert_eq!(updated.history[0].changes, changes);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn test_update_unknown_id_is_not_found_and_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("Only", "", TaskPriority::Medium).unwrap();

        let mut changes = serde_json::Map::new();
        changes.insert("status".to_string(), serde_json::json!("completed"));
        let err = store.update("TASK-9999", changes).unwrap_err();
        assert!(err.is_not_found());

        let tasks = store.list(None).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].history.is_empty());
    }

    #[test]
    fn test_update_adds_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let task = store.create("Task", "", TaskPriority::Medium).unwrap();

        let mut changes = serde_json::Map::new();
        changes.insert("owner".to_string(), serde_json::json!("alice"));
        let updated = store.update(&task.id, changes).unwrap();

        assert_eq!(updated.extra.get("owner"), Some(&serde_json::json!("alice")));
    }

    #[test]
    fn test_update_cannot_change_id() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let task = store.create("Task", "", TaskPriority::Medium).unwrap();

        let mut changes = serde_json::Map::new();
        changes.insert("id".to_string(), serde_json::json!("TASK-9999"));
        let updated = store.update(&task.id, changes).unwrap();

        assert_eq!(updated.id, task.id);
        assert!(store.get("TASK-9999").unwrap().is_none());
    }

    #[test]
    fn test_update_rejects_invalid_enum_value() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let task = store.create("Task", "", TaskPriority::Medium).unwrap();

        let mut changes = serde_json::Map::new();
        changes.insert("status".to_string(), serde_json::json!("bogus"));
        let err = store.update(&task.id, changes).unwrap_err();
        assert!(matches!(err, StoreError::InvalidChange(_)));
    }

    #[test]
    fn test_list_filters_by_status_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let a = store.create("A", "", TaskPriority::Medium).unwrap();
        let b = store.create("B", "", TaskPriority::Medium).unwrap();
        let mut changes = serde_json::Map::new();
        changes.insert("status".to_string(), serde_json::json!("completed"));
        store.update(&a.id, changes).unwrap();

        let pending = store.list(Some(TaskStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);

        // Newest first across all tasks; equal timestamps fall back to id order.
        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);
    }

    #[test]
    fn test_escalate_records_reason_and_time() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let task = store.create("Task", "", TaskPriority::Medium).unwrap();

        let escalated = store.escalate(&task.id, "needs a human").unwrap();
        assert_eq!(escalated.status, TaskStatus::Escalated);
        assert_eq!(escalated.escalation_reason.as_deref(), Some("needs a human"));
        assert!(escalated.escalated_at.is_some());
        assert_eq!(escalated.history.len(), 1);
    }

    #[test]
    fn test_escalate_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.escalate("TASK-0404", "reason").unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_file_reinitializes_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let store = TaskStore::new(&path);

        store.create("First", "", TaskPriority::Medium).unwrap();
        std::fs::write(&path, "garbage").unwrap();

        // Corrupt file reinitializes empty; the next create starts over.
        let task = store.create("Second", "", TaskPriority::Medium).unwrap();
        assert_eq!(task.id, "TASK-0001");
    }

    #[test]
    fn test_reset_drops_everything() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create("A", "", TaskPriority::Medium).unwrap();

        store.reset().unwrap();
        assert!(store.list(None).unwrap().is_empty());
        assert_eq!(store.counter().unwrap(), 0);
    }
}

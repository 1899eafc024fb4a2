//! In-memory task storage keyed by owner.
//!
//! Each owner has an independent list held in insertion order. The store is
//! thread-safe via [`RwLock`] and caps the number of tasks per owner; the
//! cap refuses further inserts rather than evicting, since tasks (unlike
//! queued messages) must never disappear silently.

use std::collections::HashMap;

use chrono::Utc;
use taskdeck_proto::task::{NewTask, Task, TaskId, TaskPatch};
use tokio::sync::RwLock;

/// Default maximum number of tasks a single owner may hold.
const DEFAULT_MAX_TASKS_PER_OWNER: usize = 1000;

/// Why an insert was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InsertError {
    /// A task with the same id already exists for this owner.
    #[error("a task with this id already exists")]
    DuplicateId,
    /// The owner's list is at capacity.
    #[error("task list is full (max {0} tasks)")]
    ListFull(usize),
}

/// Per-owner in-memory task collections.
pub struct TaskStore {
    lists: RwLock<HashMap<String, Vec<Task>>>,
    max_tasks_per_owner: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store with the default per-owner cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            max_tasks_per_owner: DEFAULT_MAX_TASKS_PER_OWNER,
        }
    }

    /// Creates an empty store with a custom per-owner cap.
    #[must_use]
    pub fn with_max_tasks(max_tasks_per_owner: usize) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            max_tasks_per_owner,
        }
    }

    /// Inserts a task for the given owner and returns the stored record.
    ///
    /// The client-generated id is honored; `completed_at` is derived from
    /// the initial `completed` flag so the pairing invariant holds from the
    /// first stored state.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::DuplicateId`] if the owner already has a task
    /// with this id, or [`InsertError::ListFull`] at the per-owner cap.
    pub async fn insert(&self, owner_id: &str, new: NewTask) -> Result<Task, InsertError> {
        let mut lists = self.lists.write().await;
        let list = lists.entry(owner_id.to_string()).or_default();

        if list.iter().any(|t| t.id == new.id) {
            return Err(InsertError::DuplicateId);
        }
        if list.len() >= self.max_tasks_per_owner {
            return Err(InsertError::ListFull(self.max_tasks_per_owner));
        }

        let task = Task {
            id: new.id,
            text: new.text,
            priority: new.priority,
            completed: new.completed,
            created_at: new.created_at,
            completed_at: new.completed.then(Utc::now),
            owner_id: owner_id.to_string(),
        };
        list.push(task.clone());
        Ok(task)
    }

    /// Applies a partial update to one of the owner's tasks.
    ///
    /// `completed_at` is stamped when `completed` transitions to true and
    /// cleared when it transitions to false; re-asserting the current state
    /// leaves the stamp untouched. Returns the updated record, or `None`
    /// if the owner has no task with this id.
    pub async fn update(&self, owner_id: &str, id: &TaskId, patch: TaskPatch) -> Option<Task> {
        let mut lists = self.lists.write().await;
        let task = lists.get_mut(owner_id)?.iter_mut().find(|t| t.id == *id)?;

        if let Some(completed) = patch.completed
            && completed != task.completed
        {
            task.completed = completed;
            task.completed_at = completed.then(Utc::now);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        Some(task.clone())
    }

    /// Removes one of the owner's tasks. Returns whether a task was removed.
    pub async fn remove(&self, owner_id: &str, id: &TaskId) -> bool {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.get_mut(owner_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|t| t.id != *id);
        list.len() != before
    }

    /// Returns the owner's tasks, newest-first by creation time.
    pub async fn list_newest_first(&self, owner_id: &str) -> Vec<Task> {
        let lists = self.lists.read().await;
        let mut tasks = lists.get(owner_id).cloned().unwrap_or_default();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }
}

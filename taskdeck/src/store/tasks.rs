//! Task store: the authoritative in-memory task list for a session.
//!
//! Mutations apply optimistically and mirror to the backend when one is
//! configured; on a remote failure the local change is rolled back, so the
//! list only diverges from the backend between a confirmed mutation and the
//! next [`refresh`](TaskStore::refresh). Every operation takes `&mut self`
//! and finishes its single remote round trip before returning, which
//! serializes mutations — there is never more than one in flight.

use chrono::Utc;
use taskdeck_proto::auth::Session;
use taskdeck_proto::task::{
    MAX_TASK_TEXT_LENGTH, NewTask, Priority, Task, TaskId, TaskPatch, validate_text,
};

use super::StoreError;
use crate::remote::ApiClient;

/// The in-memory authoritative task list plus its mutation operations.
///
/// Owns the list for the lifetime of the session; dropping the store (on
/// sign-out) discards it. Constructed from the [`Session`] loaded at
/// startup and, when a backend is configured, the [`ApiClient`] that
/// mirrors every mutation.
pub struct TaskStore {
    session: Session,
    remote: Option<ApiClient>,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates a purely local store (offline mode).
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            remote: None,
            tasks: Vec::new(),
        }
    }

    /// Creates a store that mirrors every mutation to the backend.
    #[must_use]
    pub fn with_remote(session: Session, remote: ApiClient) -> Self {
        Self {
            session,
            remote: Some(remote),
            tasks: Vec::new(),
        }
    }

    /// The session this store belongs to.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a backend is configured.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Read-only snapshot of the current list, in insertion order.
    ///
    /// Display order is a view concern — see [`super::views`].
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tears the store down into its session and remote client, for
    /// sign-out (the task list is discarded).
    #[must_use]
    pub fn into_parts(self) -> (Session, Option<ApiClient>) {
        (self.session, self.remote)
    }

    /// Replaces the local list with the backend's. Without a backend this
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remote`] if the listing fails; the local list
    /// is left unchanged in that case.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let Some(remote) = &self.remote else {
            return Ok(());
        };
        let mut tasks = remote.list().await?;
        // The backend lists newest-first; the store keeps insertion order.
        tasks.reverse();
        let count = tasks.len();
        self.tasks = tasks;
        tracing::info!(count, "task list refreshed");
        Ok(())
    }

    /// Creates a task from user input and appends it to the list.
    ///
    /// The text is trimmed; the priority defaults to medium when none is
    /// chosen. With a backend configured the append is optimistic: on a
    /// confirmed insert the store adopts the backend's canonical record, on
    /// failure the append is rolled back and the list is exactly as before.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidText`] for empty or over-long text
    /// (checked before any remote call), or [`StoreError::Remote`] when the
    /// mirror fails.
    pub async fn create_task(
        &mut self,
        text: &str,
        priority: Option<Priority>,
    ) -> Result<Task, StoreError> {
        let text = validate_text(text, MAX_TASK_TEXT_LENGTH)?.to_string();
        let task = Task {
            id: TaskId::new(),
            text,
            priority: priority.unwrap_or_default(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
            owner_id: self.session.user.id.clone(),
        };
        self.tasks.push(task.clone());

        let Some(remote) = &self.remote else {
            return Ok(task);
        };

        let new = NewTask {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority,
            completed: task.completed,
            created_at: task.created_at,
        };
        match remote.insert(&new).await {
            Ok(confirmed) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == confirmed.id) {
                    *slot = confirmed.clone();
                }
                tracing::debug!(task_id = %confirmed.id, "task created");
                Ok(confirmed)
            }
            Err(e) => {
                self.tasks.retain(|t| t.id != task.id);
                tracing::warn!(error = %e, "task creation rolled back");
                Err(e.into())
            }
        }
    }

    /// Flips a task's completion state, stamping or clearing
    /// `completed_at`.
    ///
    /// An unknown id is a silent no-op: the UI may act on a stale render
    /// and must not see an error for it. On a remote failure the prior
    /// `completed`/`completed_at` pair is restored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remote`] when the mirror fails.
    pub async fn toggle_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(());
        };

        let previous = (self.tasks[index].completed, self.tasks[index].completed_at);
        let completed = {
            let task = &mut self.tasks[index];
            task.completed = !task.completed;
            task.completed_at = task.completed.then(Utc::now);
            task.completed
        };

        let Some(remote) = &self.remote else {
            return Ok(());
        };

        let patch = TaskPatch {
            completed: Some(completed),
            priority: None,
        };
        match remote.update(id, &patch).await {
            Ok(confirmed) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == *id) {
                    *slot = confirmed;
                }
                Ok(())
            }
            Err(e) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == *id) {
                    (task.completed, task.completed_at) = previous;
                }
                tracing::warn!(task_id = %id, error = %e, "toggle rolled back");
                Err(e.into())
            }
        }
    }

    /// Removes a task by id.
    ///
    /// An unknown id is a silent no-op. On a remote failure the task is
    /// reinserted at its original position.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remote`] when the mirror fails.
    pub async fn remove_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == *id) else {
            return Ok(());
        };
        let removed = self.tasks.remove(index);

        let Some(remote) = &self.remote else {
            return Ok(());
        };

        match remote.delete(id).await {
            Ok(()) => {
                tracing::debug!(task_id = %id, "task deleted");
                Ok(())
            }
            Err(e) => {
                self.tasks.insert(index, removed);
                tracing::warn!(task_id = %id, error = %e, "delete rolled back");
                Err(e.into())
            }
        }
    }
}

//! Task model and wire types for `Taskdeck`.
//!
//! Defines the task record as exchanged with the persistence backend, the
//! priority scale, and the insert/patch payloads. Records travel as JSON;
//! timestamps serialize as RFC 3339 via chrono's serde support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default maximum task text length in characters.
pub const MAX_TASK_TEXT_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority. The derived ordering is `Low < Medium < High`, so sorting
/// descending yields the display order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default when none is chosen.
    #[default]
    Medium,
    /// Do it first.
    High,
}

impl Priority {
    /// Returns the next priority in the picker cycle: Low -> Medium -> High -> Low.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Capitalized label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A to-do entry as stored by the backend and held in the client's list.
///
/// `completed_at` is `Some` exactly when `completed` is true; both sides
/// maintain that pairing on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered).
    pub id: TaskId,
    /// Trimmed, non-empty description.
    pub text: String,
    /// Priority level.
    pub priority: Priority,
    /// Whether the task is done.
    pub completed: bool,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was completed, if it is.
    pub completed_at: Option<DateTime<Utc>>,
    /// Id of the owning user.
    pub owner_id: String,
}

/// Payload for creating a task.
///
/// No owner travels here: the backend takes the owner from the
/// authenticated token. The client-generated `id` is honored so an
/// optimistic append keeps a stable identity across confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Client-generated task identifier.
    pub id: TaskId,
    /// Trimmed description.
    pub text: String,
    /// Priority level.
    pub priority: Priority,
    /// Initial completion state (false for every UI-created task).
    pub completed: bool,
    /// Client-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial update to a task.
///
/// `completed_at` never travels: the backend derives it when `completed`
/// transitions, so the pairing invariant holds on every stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New completion state, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New priority, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Reasons task text is rejected at the creation boundary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// Empty or whitespace-only after trimming.
    #[error("task text cannot be empty")]
    Empty,
    /// Exceeds the maximum length.
    #[error("task text too long (max {0} characters)")]
    TooLong(usize),
}

/// Trims task text and validates it against `max_len` characters.
///
/// Returns the trimmed slice on success. Creation is rejected, never
/// silently coerced, when the trimmed input is empty.
///
/// # Errors
///
/// Returns [`TextError::Empty`] or [`TextError::TooLong`].
pub fn validate_text(text: &str, max_len: usize) -> Result<&str, TextError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    if trimmed.chars().count() > max_len {
        return Err(TextError::TooLong(max_len));
    }
    Ok(trimmed)
}

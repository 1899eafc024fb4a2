//! View projection over the task list.
//!
//! Pure functions of the current list: nothing here mutates the store or
//! holds state, and the UI recomputes projections whenever it draws. The
//! store's insertion order is never what the user sees — display order is
//! always priority descending, newest first within a priority.

use taskdeck_proto::task::Task;

/// Which subset of tasks the user chose to display. Ephemeral UI state,
/// not part of the task entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl Filter {
    /// Returns the next filter in the cycle: All -> Active -> Completed -> All.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    /// Label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Applies the filter to a task list.
    #[must_use]
    pub fn apply(self, tasks: &[Task]) -> Vec<&Task> {
        match self {
            Self::All => tasks.iter().collect(),
            Self::Active => select_active(tasks),
            Self::Completed => select_completed(tasks),
        }
    }
}

/// All tasks that are not completed, in the given order.
#[must_use]
pub fn select_active(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| !t.completed).collect()
}

/// All completed tasks, in the given order.
#[must_use]
pub fn select_completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

/// Stable display sort: priority descending (high first), ties broken by
/// creation time descending (newest first).
#[must_use]
pub fn sort_for_display(mut tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    tasks
}

/// Tallies for the stats row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSummary {
    /// Tasks not yet completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

/// Counts active, completed, and total tasks. `active + completed == total`
/// for any list, including the empty one.
#[must_use]
pub fn count_summary(tasks: &[Task]) -> CountSummary {
    let completed = tasks.iter().filter(|t| t.completed).count();
    CountSummary {
        active: tasks.len() - completed,
        completed,
        total: tasks.len(),
    }
}

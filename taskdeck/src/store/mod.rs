//! Task list state for the current session.
//!
//! [`tasks`] holds the authoritative list and its mutations; [`views`]
//! derives everything the UI displays from it without mutating anything.

pub mod tasks;
pub mod views;

pub use tasks::TaskStore;
pub use views::{CountSummary, Filter, count_summary, select_active, select_completed, sort_for_display};

use taskdeck_proto::task::TextError;

use crate::remote::ApiError;

/// Errors that can occur during task store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Task text was rejected before any remote interaction.
    #[error(transparent)]
    InvalidText(#[from] TextError),

    /// The backend refused or could not be reached; the optimistic local
    /// change has been rolled back. The store stays usable.
    #[error(transparent)]
    Remote(#[from] ApiError),
}

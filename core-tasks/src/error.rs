use core_api::{ApiError, TaskId};
use thiserror::Error;

/// Errors surfaced by task list operations.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The backend call failed. Carries the API layer's error so the
    /// backend's own message stays available for display.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A mutation referenced a task that is not in the local list.
    #[error("task {id} is not in the local task list")]
    UnknownTask { id: TaskId },

    /// Tasks must have a non-blank title.
    #[error("task title must not be empty")]
    EmptyTitle,
}

pub type Result<T> = std::result::Result<T, TaskError>;

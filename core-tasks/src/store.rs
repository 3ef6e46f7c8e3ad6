//! Task List State
//!
//! This module owns the local copy of the user's task list together
//! with the `loading` and `error` slots a frontend renders from. The
//! backend is the source of truth: every mutation goes to the server
//! first and only its confirmed record is written into the list.
//!
//! ## State Rules
//!
//! - A fetch replaces the whole list with the server's response, in
//!   server order. Nothing is merged.
//! - `loading` is owned by fetches. While a fetch is in flight the
//!   error slot is left alone; the fetch writes the terminal state
//!   when it completes.
//! - A failed operation stores its message in the error slot; the next
//!   successful operation clears it.
//! - When overlapping fetches race, the most recently started one wins
//!   the state. Earlier fetches still return their own outcome to
//!   their caller.
//!
//! ## Example
//!
//! ```no_run
//! use core_tasks::TaskStore;
//! # use core_api::ApiClient;
//! # use core_runtime::events::EventBus;
//! # use std::sync::Arc;
//! # async fn example(api: Arc<ApiClient>) -> core_tasks::Result<()> {
//! let tasks = TaskStore::new(api, EventBus::default());
//!
//! tasks.fetch_tasks().await?;
//! let added = tasks.add_task("買い物に行く").await?;
//! tasks.toggle_task(added.id).await?;
//! # Ok(())
//! # }
//! ```

use core_api::{ApiClient, Task, TaskChanges, TaskId};
use core_runtime::events::{CoreEvent, EventBus, TaskEvent};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};

/// Point-in-time view of the task list for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListSnapshot {
    /// Tasks in server order
    pub tasks: Vec<Task>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Message of the most recent failure, cleared by the next success
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct TaskListState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    /// Stamp of the most recently started fetch. A completing fetch
    /// only writes state if its stamp is still the current one.
    fetch_generation: u64,
}

/// Holder of the task list and its loading and error slots.
pub struct TaskStore {
    /// Backend adapter shared with the rest of the client
    api: Arc<ApiClient>,

    /// List, slots and the fetch stamp, under one lock
    state: RwLock<TaskListState>,

    /// Bus for task lifecycle events
    events: EventBus,
}

impl TaskStore {
    /// Create a store over the given backend adapter
    pub fn new(api: Arc<ApiClient>, events: EventBus) -> Self {
        Self {
            api,
            state: RwLock::new(TaskListState::default()),
            events,
        }
    }

    /// Refresh the list via `GET /todos`.
    ///
    /// Marks the list loading, clears the error slot and replaces the
    /// list with whatever the backend returns. On failure the previous
    /// list is kept and the error slot carries the failure message.
    ///
    /// If another fetch starts while this one is in flight, the newer
    /// fetch owns the state; this one still returns its own outcome.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let generation = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            state.fetch_generation += 1;
            state.fetch_generation
        };
        debug!("Fetching task list");
        self.events
            .emit(CoreEvent::Task(TaskEvent::FetchStarted))
            .ok();

        let outcome = self.api.fetch_tasks().await;

        let mut state = self.state.write().await;
        if state.fetch_generation != generation {
            debug!("Fetch was superseded, leaving state to the newer one");
            return outcome.map_err(TaskError::from);
        }

        match outcome {
            Ok(tasks) => {
                for task in &tasks {
                    warn_on_inconsistent_completion(task);
                }
                state.tasks = tasks.clone();
                state.loading = false;
                state.error = None;
                drop(state);

                info!(count = tasks.len(), "Task list refreshed");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::FetchCompleted {
                        count: tasks.len(),
                    }))
                    .ok();
                Ok(tasks)
            }
            Err(e) => {
                let message = e.to_string();
                state.loading = false;
                state.error = Some(message.clone());
                drop(state);

                warn!(error = %message, "Task list fetch failed");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::FetchFailed { message }))
                    .ok();
                Err(e.into())
            }
        }
    }

    /// Create a task via `POST /todos` and append the stored record.
    ///
    /// Blank titles are rejected locally before any request is made.
    pub async fn add_task(&self, title: impl Into<String>) -> Result<Task> {
        let title = title.into();
        if title.trim().is_empty() {
            return self.record_failure(TaskError::EmptyTitle).await;
        }

        match self.api.create_task(&title).await {
            Ok(task) => {
                {
                    let mut state = self.state.write().await;
                    state.tasks.push(task.clone());
                    state.error = None;
                }
                info!(task_id = %task.id, "Added task");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::TaskAdded { id: task.id.get() }))
                    .ok();
                Ok(task)
            }
            Err(e) => self.record_failure(e.into()).await,
        }
    }

    /// Rename a task via `PUT /todos/{id}`.
    ///
    /// The task does not have to be in the local list; the backend
    /// decides whether it exists. Blank titles are rejected locally.
    pub async fn update_task(&self, id: TaskId, title: impl Into<String>) -> Result<Task> {
        let title = title.into();
        if title.trim().is_empty() {
            return self.record_failure(TaskError::EmptyTitle).await;
        }

        match self.api.update_task(id, &TaskChanges::rename(title)).await {
            Ok(task) => {
                self.apply_replacement(&task).await;
                info!(task_id = %task.id, "Renamed task");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::TaskUpdated { id: task.id.get() }))
                    .ok();
                Ok(task)
            }
            Err(e) => self.record_failure(e.into()).await,
        }
    }

    /// Flip a task's completion flag via `PUT /todos/{id}`.
    ///
    /// The target state is the inverse of what the local list shows,
    /// so the task must be present locally. The request carries only
    /// the flag; the title is not resent.
    pub async fn toggle_task(&self, id: TaskId) -> Result<Task> {
        let current = {
            let state = self.state.read().await;
            state
                .tasks
                .iter()
                .find(|task| task.id == id)
                .map(|task| task.completed)
        };
        let Some(current) = current else {
            return self.record_failure(TaskError::UnknownTask { id }).await;
        };

        let changes = TaskChanges::set_completed(!current);
        match self.api.update_task(id, &changes).await {
            Ok(task) => {
                let completed = task.completed;
                self.apply_replacement(&task).await;
                info!(task_id = %task.id, completed, "Toggled task");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::TaskToggled {
                        id: task.id.get(),
                        completed,
                    }))
                    .ok();
                Ok(task)
            }
            Err(e) => self.record_failure(e.into()).await,
        }
    }

    /// Delete a task via `DELETE /todos/{id}` and drop it locally.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        match self.api.delete_task(id).await {
            Ok(()) => {
                {
                    let mut state = self.state.write().await;
                    state.tasks.retain(|task| task.id != id);
                    state.error = None;
                }
                info!(task_id = %id, "Deleted task");
                self.events
                    .emit(CoreEvent::Task(TaskEvent::TaskDeleted { id: id.get() }))
                    .ok();
                Ok(())
            }
            Err(e) => self.record_failure(e.into()).await,
        }
    }

    /// Write a confirmed record over its slot in the list.
    ///
    /// If the list was refreshed out from under the mutation and the
    /// task is gone, the record is dropped; the next fetch is the
    /// source of truth.
    async fn apply_replacement(&self, task: &Task) {
        warn_on_inconsistent_completion(task);
        let mut state = self.state.write().await;
        match state.tasks.iter_mut().find(|slot| slot.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => {
                debug!(task_id = %task.id, "Confirmed task is no longer in the local list");
            }
        }
        state.error = None;
    }

    /// Record a failed operation and hand the error back.
    ///
    /// The error slot is only written when no fetch is in flight; an
    /// in-flight fetch owns the slots and writes the terminal state
    /// itself when it completes.
    async fn record_failure<T>(&self, error: TaskError) -> Result<T> {
        let message = error.to_string();
        {
            let mut state = self.state.write().await;
            if !state.loading {
                state.error = Some(message.clone());
            }
        }
        warn!(error = %message, "Task operation failed");
        self.events
            .emit(CoreEvent::Task(TaskEvent::MutationFailed { message }))
            .ok();
        Err(error)
    }

    /// Snapshot of the list and slots for rendering
    pub async fn snapshot(&self) -> TaskListSnapshot {
        let state = self.state.read().await;
        TaskListSnapshot {
            tasks: state.tasks.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Current tasks in server order
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Whether a fetch is in flight
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Message of the most recent failure, if not yet cleared
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}

fn warn_on_inconsistent_completion(task: &Task) {
    if !task.completion_consistent() {
        warn!(
            task_id = %task.id,
            completed = task.completed,
            "Completion flag and timestamp disagree, trusting the flag"
        );
    }
}

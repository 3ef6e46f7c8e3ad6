use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user account.
///
/// Identifiers are assigned by the backend and never minted locally.
///
/// # Examples
///
/// ```
/// use core_api::UserId;
///
/// let id = UserId::new(1);
/// assert_eq!(id.get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier assigned by the backend
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a task.
///
/// # Examples
///
/// ```
/// use core_api::TaskId;
///
/// let id = TaskId::new(42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a raw identifier assigned by the backend
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// An authenticated user account as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single todo item as the backend reports it.
///
/// Every field comes from the server; tasks are never built locally
/// except inside tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Timestamp of the most recent completion, if the task is done.
    pub completed_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether `completed` and `completed_at` agree.
    ///
    /// The backend stamps `completed_at` when a task is marked done and
    /// clears it when the task is reopened, so the two fields should
    /// always move together. A record where they disagree is still
    /// usable; `completed` is the authoritative flag.
    pub fn completion_consistent(&self) -> bool {
        self.completed == self.completed_at.is_some()
    }
}

/// Credentials submitted to `POST /login`.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    /// Build a credentials pair from user input
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Custom Debug implementation to avoid logging passwords
impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Payload returned by a successful `POST /login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Body for `POST /todos`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTask {
    pub title: String,
}

/// Partial update body for `PUT /todos/{id}`.
///
/// Only the fields that are set are serialized, so a completion toggle
/// does not resend the title and a rename does not touch the flag.
///
/// # Examples
///
/// ```
/// use core_api::TaskChanges;
///
/// let changes = TaskChanges::set_completed(true);
/// let json = serde_json::to_string(&changes).unwrap();
/// assert_eq!(json, r#"{"completed":true}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskChanges {
    /// Change only the title
    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Change only the completion flag
    pub fn set_completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

//! HTTP adapter for the todo backend.
//!
//! Wraps a platform [`HttpClient`] with the backend's routes, bearer
//! authentication and error mapping. The adapter is deliberately thin:
//! it owns no session or task state, and every request is sent exactly
//! once. Retrying a failed operation is the caller's decision.

use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{ApiError, Result};
use crate::models::{
    CreateTask, ErrorBody, LoginCredentials, LoginResponse, Task, TaskChanges, TaskId,
};
use crate::token::TokenSource;

/// Timeout applied to every request unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the todo REST backend.
///
/// One instance is shared by every store; it holds no mutable state of
/// its own. The bearer token is read from the [`TokenSource`]
/// immediately before each send, so requests always carry the token of
/// the session that is active at that moment.
///
/// # Example
///
/// ```ignore
/// use core_api::{ApiClient, StaticTokenSource};
/// use std::sync::Arc;
///
/// let api = ApiClient::new("http://localhost:3001/api", http_client, Arc::new(tokens));
/// let tasks = api.fetch_tasks().await?;
/// ```
pub struct ApiClient {
    /// HTTP bridge used for every request
    http: Arc<dyn HttpClient>,

    /// Where the bearer token comes from at send time
    tokens: Arc<dyn TokenSource>,

    /// Backend base URL, stored without a trailing slash
    base_url: String,

    /// Timeout applied to each request
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend root, e.g. `http://localhost:3001/api`
    /// * `http` - Platform HTTP implementation
    /// * `tokens` - Source of the bearer token for authenticated routes
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            tokens,
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Replace the default per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Backend base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.endpoint(path))
            .header("Accept", "application/json")
            .timeout(self.timeout)
    }

    /// Attach the current bearer token, if any.
    ///
    /// Reading the token here rather than at request construction means
    /// a login or logout that lands while a call is queued is reflected
    /// in what actually goes on the wire.
    async fn authorize(&self, request: HttpRequest) -> HttpRequest {
        match self.tokens.bearer_token().await {
            Some(token) => request.bearer_token(token),
            None => request,
        }
    }

    /// Send a request once and map the outcome onto [`ApiError`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.authorize(request).await;
        let method = request.method;
        let url = request.url.clone();

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    method = method.as_str(),
                    url = %url,
                    error = %e,
                    "Request failed before a response arrived"
                );
                return Err(e.into());
            }
        };

        if response.is_success() {
            debug!(
                method = method.as_str(),
                url = %url,
                status = response.status,
                "Request succeeded"
            );
            Ok(response)
        } else {
            Err(Self::server_error(method, &url, &response))
        }
    }

    /// Turn a non-2xx response into a `Server` error.
    ///
    /// The backend puts a human-readable `{message}` body on its
    /// rejections; when that is missing or unreadable a generic message
    /// built from the status code stands in.
    fn server_error(method: HttpMethod, url: &str, response: &HttpResponse) -> ApiError {
        let status = response.status;
        let message = response
            .json::<ErrorBody>()
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("server returned status {status}"));
        warn!(
            method = method.as_str(),
            url = %url,
            status,
            message = %message,
            "Backend rejected request"
        );
        ApiError::Server { status, message }
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Authenticate via `POST /login`.
    ///
    /// On success the backend returns the user record and a fresh
    /// bearer token. The client stores neither; session handling lives
    /// a layer up.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        info!("Logging in");

        let request = self
            .request(HttpMethod::Post, "/login")
            .json(credentials)?;
        let response = self.send(request).await?;
        let login: LoginResponse = Self::decode(&response)?;

        info!(user_id = %login.user.id, "Login accepted");
        Ok(login)
    }

    /// Fetch the complete task list via `GET /todos`.
    ///
    /// The backend returns tasks in its own order, which is preserved.
    #[instrument(skip(self))]
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        debug!("Fetching task list");

        let request = self.request(HttpMethod::Get, "/todos");
        let response = self.send(request).await?;
        let tasks: Vec<Task> = Self::decode(&response)?;

        debug!(count = tasks.len(), "Fetched task list");
        Ok(tasks)
    }

    /// Create a task via `POST /todos` and return the stored record.
    #[instrument(skip(self))]
    pub async fn create_task(&self, title: &str) -> Result<Task> {
        let body = CreateTask {
            title: title.to_string(),
        };
        let request = self.request(HttpMethod::Post, "/todos").json(&body)?;
        let response = self.send(request).await?;
        let task: Task = Self::decode(&response)?;

        info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Update a task via `PUT /todos/{id}` and return the stored record.
    ///
    /// `changes` carries only the fields being modified; the backend
    /// leaves everything else untouched.
    #[instrument(skip(self, changes))]
    pub async fn update_task(&self, id: TaskId, changes: &TaskChanges) -> Result<Task> {
        let request = self
            .request(HttpMethod::Put, &format!("/todos/{id}"))
            .json(changes)?;
        let response = self.send(request).await?;
        let task: Task = Self::decode(&response)?;

        info!(task_id = %task.id, "Updated task");
        Ok(task)
    }

    /// Delete a task via `DELETE /todos/{id}`.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        let request = self.request(HttpMethod::Delete, &format!("/todos/{id}"));
        self.send(request).await?;

        info!(task_id = %id, "Deleted task");
        Ok(())
    }
}

// Custom Debug implementation to keep trait objects out of the output
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("http", &"HttpClient { ... }")
            .finish()
    }
}

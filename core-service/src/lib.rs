//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP and
//! key-value storage) into the shared client core and exposes one
//! handle, [`TodoCore`], that owns the session, the task list and the
//! event bus. Desktop apps typically keep the default `native-shims`
//! feature, which pulls in `bridge-desktop` and adds
//! [`TodoCore::bootstrap_native`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_api::{ApiClient, LoginCredentials, User};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_session::{AuthToken, SessionStore};
use core_tasks::TaskStore;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Construction order matters: the event bus first, then the session
/// store (which rehydrates any persisted session), then the API client
/// with the session store as its token source, and the task store on
/// top. Cloning the façade is cheap and every clone shares the same
/// state.
#[derive(Clone)]
pub struct TodoCore {
    events: EventBus,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    tasks: Arc<TaskStore>,
}

impl TodoCore {
    /// Wire up the client core from a validated configuration.
    ///
    /// The configuration carries the bridge handles, so this cannot
    /// fail; anything invalid was already rejected by
    /// [`CoreConfig::builder`](core_runtime::config::CoreConfig::builder).
    pub async fn initialize(config: CoreConfig) -> Self {
        let events = EventBus::new(config.event_buffer);

        let session =
            Arc::new(SessionStore::open(config.kv_store.clone(), events.clone()).await);

        let api = Arc::new(
            ApiClient::new(
                config.api_base_url.clone(),
                config.http_client.clone(),
                session.clone(),
            )
            .with_timeout(config.request_timeout),
        );

        let tasks = Arc::new(TaskStore::new(api.clone(), events.clone()));

        info!(base_url = %config.api_base_url, "Core initialized");
        Self {
            events,
            api,
            session,
            tasks,
        }
    }

    /// The session store
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// The task list store
    pub fn tasks(&self) -> Arc<TaskStore> {
        Arc::clone(&self.tasks)
    }

    /// The backend API adapter
    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    /// The core event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to core events from this point on
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Authenticate against the backend and establish the session.
    ///
    /// On success the session store holds the user and token, both
    /// persisted, and task operations are authenticated from here on.
    /// On failure the session is untouched and the backend's message
    /// is carried in the returned error.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        let response = self.api.login(credentials).await?;
        let user = response.user.clone();
        self.session
            .login(response.user, AuthToken::new(response.token))
            .await;
        Ok(user)
    }

    /// Sign out and clear the persisted session
    pub async fn logout(&self) {
        self.session.logout().await;
    }
}

#[cfg(feature = "native-shims")]
impl TodoCore {
    /// Bootstrap with the desktop bridges.
    ///
    /// Builds a reqwest-backed HTTP client and a SQLite key-value
    /// store (under the platform data directory unless `state_path`
    /// says otherwise), then initializes the core against
    /// `api_base_url`.
    ///
    /// ```ignore
    /// use core_service::TodoCore;
    ///
    /// let core = TodoCore::bootstrap_native("http://localhost:3001/api", None).await?;
    /// core.tasks().fetch_tasks().await?;
    /// ```
    pub async fn bootstrap_native(
        api_base_url: impl Into<String>,
        state_path: Option<std::path::PathBuf>,
    ) -> Result<Self> {
        use bridge_desktop::{default_state_path, ReqwestHttpClient, SqliteKeyValueStore};

        let state_path = match state_path {
            Some(path) => path,
            None => default_state_path()?,
        };
        let kv_store = SqliteKeyValueStore::open(state_path).await?;

        let config = CoreConfig::builder()
            .api_base_url(api_base_url)
            .http_client(Arc::new(ReqwestHttpClient::new()))
            .key_value_store(Arc::new(kv_store))
            .build()?;

        Ok(Self::initialize(config).await)
    }
}

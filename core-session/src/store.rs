//! Session State and Persistence
//!
//! This module owns who is signed in. The current [`Session`] lives in
//! memory behind a lock; every change is also written through to the
//! key-value bridge so the session survives a restart.
//!
//! ## Persistence Rules
//!
//! - State is stored as JSON under one fixed key, [`SESSION_STORAGE_KEY`]
//! - A missing record means signed out, not an error
//! - An unreadable or partial record is discarded and removed; the
//!   client starts signed out rather than half-authenticated
//! - Persistence failures are logged and otherwise ignored: login and
//!   logout always succeed in memory
//!
//! ## Security
//!
//! - Token values are never logged
//! - Email addresses are redacted in log output
//!
//! ## Example
//!
//! ```no_run
//! use core_runtime::events::EventBus;
//! use core_session::{AuthToken, SessionStore};
//! use std::sync::Arc;
//! # use bridge_traits::KeyValueStore;
//! # use core_api::User;
//! # async fn example(kv_store: Arc<dyn KeyValueStore>, user: User) {
//! let sessions = SessionStore::open(kv_store, EventBus::default()).await;
//!
//! sessions.login(user, AuthToken::new("t-123")).await;
//! assert!(sessions.is_authenticated().await);
//!
//! sessions.logout().await;
//! # }
//! ```

use async_trait::async_trait;
use bridge_traits::KeyValueStore;
use core_api::{TokenSource, User};
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use core_runtime::logging::redact_if_sensitive;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::types::{AuthToken, Session};

/// Fixed key the session record is persisted under.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Holder of the current session, with write-through persistence.
///
/// One instance is shared by the whole client. It doubles as the
/// [`TokenSource`] for the API client, so whatever session is active
/// when a request goes out is the one that authenticates it.
pub struct SessionStore {
    /// Key-value bridge the session is persisted to
    store: Arc<dyn KeyValueStore>,

    /// The in-memory session, authoritative between restarts
    session: RwLock<Session>,

    /// Bus for session lifecycle events
    events: EventBus,
}

impl SessionStore {
    /// Open the store, restoring any persisted session.
    ///
    /// Never fails: a missing, unreadable or inconsistent record just
    /// means the client starts signed out. Broken records are removed
    /// so they are not re-examined on every start.
    pub async fn open(store: Arc<dyn KeyValueStore>, events: EventBus) -> Self {
        let session = Self::rehydrate(store.as_ref()).await;
        Self {
            store,
            session: RwLock::new(session),
            events,
        }
    }

    async fn rehydrate(store: &dyn KeyValueStore) -> Session {
        let raw = match store.get(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted session, starting signed out");
                return Session::empty();
            }
            Err(e) => {
                warn!(error = %e, "Could not read persisted session, starting signed out");
                return Session::empty();
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if session.is_consistent() => {
                if session.authenticated {
                    if let Some(user) = &session.user {
                        info!(user_id = %user.id, "Restored signed-in session");
                    }
                } else {
                    debug!("Restored signed-out session");
                }
                session
            }
            Ok(_) => {
                warn!("Persisted session is inconsistent, discarding it");
                Self::discard_record(store).await;
                Session::empty()
            }
            Err(e) => {
                warn!(error = %e, "Persisted session is unreadable, discarding it");
                Self::discard_record(store).await;
                Session::empty()
            }
        }
    }

    async fn discard_record(store: &dyn KeyValueStore) {
        if let Err(e) = store.remove(SESSION_STORAGE_KEY).await {
            warn!(error = %e, "Could not remove broken session record");
        }
    }

    /// Record a successful login.
    ///
    /// Replaces whatever session was active, persists the new one and
    /// emits [`SessionEvent::LoggedIn`]. Cannot fail; if persistence is
    /// unavailable the session still holds until the process exits.
    pub async fn login(&self, user: User, token: AuthToken) {
        let user_id = user.id;
        let email = redact_if_sensitive("user_email", &user.email);
        let session = Session::signed_in(user, token);

        {
            let mut current = self.session.write().await;
            *current = session.clone();
        }
        self.persist(&session).await;

        info!(user_id = %user_id, email = %email, "Signed in");
        self.events
            .emit(CoreEvent::Session(SessionEvent::LoggedIn {
                user_id: user_id.get(),
            }))
            .ok();
    }

    /// Sign out.
    ///
    /// Clears the session in memory, overwrites the persisted record
    /// with the signed-out state and emits [`SessionEvent::LoggedOut`].
    /// Signing out while signed out is a no-op that still persists.
    pub async fn logout(&self) {
        let session = Session::empty();
        {
            let mut current = self.session.write().await;
            *current = session.clone();
        }
        self.persist(&session).await;

        info!("Signed out");
        self.events
            .emit(CoreEvent::Session(SessionEvent::LoggedOut))
            .ok();
    }

    async fn persist(&self, session: &Session) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Could not serialize session, skipping persistence");
                return;
            }
        };
        if let Err(e) = self.store.set(SESSION_STORAGE_KEY, &raw).await {
            warn!(error = %e, "Could not persist session, it will not survive a restart");
        }
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// The signed-in user, if any
    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    /// The active bearer token, if any
    pub async fn token(&self) -> Option<AuthToken> {
        self.session.read().await.token.clone()
    }

    /// Whether a user is currently signed in
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.authenticated
    }
}

#[async_trait]
impl TokenSource for SessionStore {
    async fn bearer_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .token
            .as_ref()
            .map(|token| token.as_str().to_string())
    }
}

// Custom Debug implementation to keep the token out of the output
impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("store", &"KeyValueStore { ... }")
            .field("session", &"RwLock { ... }")
            .finish()
    }
}

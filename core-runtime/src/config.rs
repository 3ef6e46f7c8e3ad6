//! # Core Configuration Module
//!
//! Provides configuration management for the todo core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary dependencies and settings for the core library.
//! It enforces fail-fast validation to ensure all required bridges are provided
//! before initialization.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Transport for the backend API
//! - `KeyValueStore` - Durable persistence for the session record
//!
//! Native hosts usually obtain both through the `native-shims` feature of
//! `core-service` rather than injecting them by hand.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://todo.example.com/api")
//!     .http_client(Arc::new(MyHttpClient))
//!     .key_value_store(Arc::new(MyKvStore))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all required dependencies and provides actionable error
//! messages when capabilities are missing: `build()` returns
//! [`Error::CapabilityMissing`](crate::error::Error::CapabilityMissing) naming
//! the absent bridge and how to supply it.

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{HttpClient, KeyValueStore};
use std::sync::Arc;
use std::time::Duration;

/// Base URL used when the host does not configure one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost.nyudogumo.work/api";

/// Per-request timeout used when the host does not configure one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Core configuration for the todo core.
///
/// This struct holds all dependencies and settings required to initialize
/// the core library. Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Base URL of the backend API, without a trailing slash requirement
    pub api_base_url: String,

    /// Timeout applied to each outgoing request
    pub request_timeout: Duration,

    /// Buffer size of the event bus channel
    pub event_buffer: usize,

    /// HTTP transport for API requests (required)
    pub http_client: Arc<dyn HttpClient>,

    /// Durable key-value storage for the session record (required)
    pub kv_store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("event_buffer", &self.event_buffer)
            .field("http_client", &"HttpClient { ... }")
            .field("kv_store", &"KeyValueStore { ... }")
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Base URL is non-empty and uses an http(s) scheme
    /// - Request timeout is within a sane range
    /// - Event buffer is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "API base URL must use http or https: {}",
                self.api_base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout > Duration::from_secs(300) {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 5 minutes".to_string(),
            ));
        }

        if self.event_buffer == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for API access. \
                 Desktop: enable the 'native-shims' feature of core-service to use the default ReqwestHttpClient. \
                 Other hosts: inject a platform-native transport via .http_client()."
            .to_string(),
    }
}

fn kv_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "KeyValueStore implementation is required for session persistence. \
                 Desktop: enable the 'native-shims' feature of core-service to use the default SqliteKeyValueStore. \
                 Web: inject a localStorage-backed store via .key_value_store()."
            .to_string(),
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
/// The builder validates required dependencies and provides helpful error
/// messages.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    event_buffer: Option<usize>,
    http_client: Option<Arc<dyn HttpClient>>,
    kv_store: Option<Arc<dyn KeyValueStore>>,
}

impl CoreConfigBuilder {
    /// Sets the backend API base URL.
    ///
    /// Default: [`DEFAULT_API_BASE_URL`]. A trailing slash is tolerated; the
    /// API client joins endpoint paths either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .api_base_url("https://todo.example.com/api");
    /// ```
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: [`DEFAULT_EVENT_BUFFER_SIZE`].
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = Some(capacity);
        self
    }

    /// Sets the HTTP client implementation (required).
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use core_runtime::config::CoreConfig;
    /// use std::sync::Arc;
    ///
    /// let builder = CoreConfig::builder()
    ///     .http_client(Arc::new(MyHttpClient));
    /// ```
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the key-value store implementation (required).
    ///
    /// The store holds the serialized session record so a signed-in session
    /// survives application restarts.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = Some(store);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// This validates all required dependencies are provided and returns
    /// an error with an actionable message if anything is missing.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - Required bridges are missing (HttpClient, KeyValueStore)
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let http_client = self.http_client.ok_or_else(http_client_missing_error)?;
        let kv_store = self.kv_store.ok_or_else(kv_store_missing_error)?;

        let config = CoreConfig {
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            event_buffer: self.event_buffer.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            http_client,
            kv_store,
        };

        config.validate()?;

        Ok(config)
    }
}

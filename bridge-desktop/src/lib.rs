//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge
//! traits using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `KeyValueStore` using a SQLite database via `sqlx`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{default_state_path, ReqwestHttpClient, SqliteKeyValueStore};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = ReqwestHttpClient::new();
//!     let kv_store = SqliteKeyValueStore::open(default_state_path()?).await?;
//!
//!     // Hand both to the core configuration
//!     Ok(())
//! }
//! ```

mod http;
mod kv;

pub use http::ReqwestHttpClient;
pub use kv::{default_state_path, SqliteKeyValueStore};

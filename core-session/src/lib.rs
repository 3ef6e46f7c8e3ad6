//! # Session Module
//!
//! Who is signed in, and keeping that fact across restarts.
//!
//! ## Overview
//!
//! This module holds the client's authentication state: the signed-in
//! [`User`](core_api::User) and the bearer [`AuthToken`] the backend
//! issued for them. State lives in memory and is written through to
//! the key-value bridge under a fixed key, so a restarted client picks
//! up where it left off.
//!
//! ## Features
//!
//! - Write-through persistence with crash-safe rehydration
//! - Broken or partial records are discarded, never trusted
//! - Infallible login/logout; storage trouble only costs durability
//! - Acts as the API client's [`TokenSource`](core_api::TokenSource)
//! - Session lifecycle events on the core event bus

pub mod store;
pub mod types;

pub use store::{SessionStore, SESSION_STORAGE_KEY};
pub use types::{AuthToken, Session};

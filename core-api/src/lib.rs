//! # Backend API Module
//!
//! Wire models and the HTTP adapter for the todo REST backend.
//!
//! ## Overview
//!
//! This module defines what travels between the client core and the
//! backend: the `User` and `Task` records, the login payloads, and
//! [`ApiClient`], which turns a platform [`HttpClient`] into typed
//! backend calls. Authentication is a bearer token pulled from a
//! [`TokenSource`] right before each request goes out.
//!
//! ## Features
//!
//! - Typed models for every route, with identifiers as newtypes
//! - Bearer tokens resolved at send time, never cached in the client
//! - Backend error messages surfaced verbatim for display
//! - Single-shot requests; no retry or backoff at this layer
//! - Structural credential validation for presentation layers
//!
//! [`HttpClient`]: bridge_traits::HttpClient

pub mod client;
pub mod error;
pub mod models;
pub mod token;
pub mod validation;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ApiError, Result};
pub use models::{
    CreateTask, LoginCredentials, LoginResponse, Task, TaskChanges, TaskId, User, UserId,
};
pub use token::{StaticTokenSource, TokenSource};
pub use validation::{CredentialsError, MIN_PASSWORD_LENGTH};

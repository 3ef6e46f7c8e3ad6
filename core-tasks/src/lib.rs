//! # Task List Module
//!
//! The local task list and the operations that change it.
//!
//! ## Overview
//!
//! This module keeps the client's copy of the user's tasks plus the
//! `loading` and `error` slots a frontend renders from. All five
//! operations (fetch, add, rename, toggle, delete) go through the
//! backend first; local state only ever holds server-confirmed
//! records. There is no offline queue and no optimistic update.
//!
//! ## Features
//!
//! - Fetch replaces the list wholesale, preserving server order
//! - Mutations apply the server's confirmed record, never local guesses
//! - One error slot with last-failure-wins semantics
//! - Overlapping fetches resolve to the most recently started one
//! - Task lifecycle events on the core event bus

pub mod error;
pub mod store;

pub use error::{Result, TaskError};
pub use store::{TaskListSnapshot, TaskStore};

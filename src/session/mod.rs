// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Lifecycle
//!
//! A session id moves through `nonexistent → active → (expired | destroyed)`.
//! `expired` is never stored: it is computed at lookup time from the
//! record's `created_at` (lazy expiration, no background sweep).
//!
//! ## Layers
//!
//! - [`SessionStore`] owns the `session_id → SessionRecord` mapping
//!   (in-memory map or the redb `user_sessions` table).
//! - [`PlainSessions`] implements [`SessionLifecycle`] over any store.
//! - [`ExpiringSessions`] wraps a [`PlainSessions`] and adds the age check.

pub mod clock;
pub mod database;
pub mod manager;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::DbError;

pub use clock::{Clock, SystemClock};
pub use database::DatabaseSessionStore;
pub use manager::{ExpiringSessions, PlainSessions};
pub use store::{MemorySessionStore, SessionStore};

/// A live session binding an opaque id to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session id collision: {0}")]
    Collision(String),

    #[error("session storage error: {0}")]
    Storage(#[from] DbError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Create, resolve and destroy sessions.
///
/// Misses (empty ids, unknown or expired sessions) are `Ok(None)` /
/// `Ok(false)`. Errors are reserved for storage faults.
pub trait SessionLifecycle: Send + Sync {
    /// Start a session for `user_id`. An empty user id yields `Ok(None)`.
    fn create(&self, user_id: &str) -> SessionResult<Option<String>>;

    /// Resolve a session id to its user id.
    fn lookup(&self, session_id: &str) -> SessionResult<Option<String>>;

    /// Remove a session. Returns whether anything was removed.
    fn destroy(&self, session_id: &str) -> SessionResult<bool>;
}

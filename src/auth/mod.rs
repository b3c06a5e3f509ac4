// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Pluggable request authentication selected by `AUTH_TYPE`.
//!
//! ## Strategies
//!
//! - `NullAuth` identifies nobody; unconfigured it permits every request,
//!   as the base `auth` strategy it rejects every gated one
//! - `BasicAuth` reads `Authorization: Basic base64(email:password)`
//! - `SessionAuth` reads the session cookie and resolves it through a
//!   session engine (plain, expiring or database-backed)
//!
//! ## Request flow
//!
//! 1. `auth_gate` checks the path against the excluded patterns
//! 2. Requests without any credential get 401
//! 3. Credentials resolving to no user get 403
//! 4. Handlers receive the user through the `CurrentUser` extractor

pub mod basic;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod path_matcher;
pub mod session;
pub mod strategy;

use std::sync::Arc;

pub use basic::BasicAuth;
pub use error::AuthError;
pub use extractor::CurrentUser;
pub use middleware::auth_gate;
pub use session::SessionAuth;
pub use strategy::{AuthStrategy, NullAuth};

use crate::config::{AuthConfig, AuthType};
use crate::session::{
    DatabaseSessionStore, ExpiringSessions, MemorySessionStore, PlainSessions, SessionLifecycle,
};
use crate::storage::AuthDatabase;
use crate::users::UserDirectory;

/// Build the strategy named by `config.auth_type`.
pub fn build_strategy(config: &AuthConfig, db: Arc<AuthDatabase>) -> Arc<dyn AuthStrategy> {
    let users: Arc<dyn UserDirectory> = db.clone();

    let sessions: Arc<dyn SessionLifecycle> = match config.auth_type {
        AuthType::None | AuthType::Auth => {
            return Arc::new(NullAuth::new(config.auth_type, config.session_name.clone()))
        }
        AuthType::BasicAuth => return Arc::new(BasicAuth::new(users, config.session_name.clone())),
        AuthType::SessionAuth => Arc::new(PlainSessions::new(Arc::new(MemorySessionStore::new()))),
        AuthType::SessionExpAuth => Arc::new(ExpiringSessions::new(
            PlainSessions::new(Arc::new(MemorySessionStore::new())),
            config.session_duration_secs,
        )),
        AuthType::SessionDbAuth => Arc::new(ExpiringSessions::new(
            PlainSessions::new(Arc::new(DatabaseSessionStore::new(db))),
            config.session_duration_secs,
        )),
    };

    tracing::info!(
        auth_type = %config.auth_type,
        duration_secs = config.session_duration_secs,
        "Session authentication enabled"
    );
    Arc::new(SessionAuth::new(
        config.auth_type,
        config.session_name.clone(),
        sessions,
        users,
    ))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie authentication.
//!
//! One strategy covers the plain, expiring and database-backed variants;
//! they differ only in the [`SessionLifecycle`] engine passed in.

use std::sync::Arc;

use axum::http::HeaderMap;

use super::{AuthError, AuthStrategy};
use crate::config::AuthType;
use crate::session::{SessionLifecycle, SessionResult};
use crate::users::{User, UserDirectory};

pub struct SessionAuth {
    auth_type: AuthType,
    cookie_name: String,
    sessions: Arc<dyn SessionLifecycle>,
    users: Arc<dyn UserDirectory>,
}

impl SessionAuth {
    pub fn new(
        auth_type: AuthType,
        cookie_name: impl Into<String>,
        sessions: Arc<dyn SessionLifecycle>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            auth_type,
            cookie_name: cookie_name.into(),
            sessions,
            users,
        }
    }

    pub fn create_session(&self, user_id: &str) -> SessionResult<Option<String>> {
        let session_id = self.sessions.create(user_id)?;
        if session_id.is_some() {
            tracing::info!(user_id, "Session started");
        }
        Ok(session_id)
    }

    pub fn user_id_for_session_id(&self, session_id: &str) -> SessionResult<Option<String>> {
        self.sessions.lookup(session_id)
    }

    /// Log out: destroy the session named by the request cookie.
    pub fn destroy_session(&self, headers: &HeaderMap) -> SessionResult<bool> {
        let Some(session_id) = self.session_cookie(headers) else {
            return Ok(false);
        };
        let destroyed = self.sessions.destroy(session_id)?;
        if destroyed {
            tracing::info!("Session ended");
        }
        Ok(destroyed)
    }

    /// `Set-Cookie` value carrying `session_id`.
    pub fn set_cookie_value(&self, session_id: &str) -> String {
        format!("{}={session_id}; Path=/; HttpOnly; SameSite=Lax", self.cookie_name)
    }
}

impl AuthStrategy for SessionAuth {
    fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    fn session_name(&self) -> &str {
        &self.cookie_name
    }

    fn extract_auth_token(&self, headers: &HeaderMap) -> Option<String> {
        self.session_cookie(headers).map(str::to_string)
    }

    fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, AuthError> {
        let Some(session_id) = self.session_cookie(headers) else {
            return Ok(None);
        };
        let Some(user_id) = self.sessions.lookup(session_id)? else {
            return Ok(None);
        };
        Ok(self.users.find_by_id(&user_id)?)
    }

    fn sessions(&self) -> Option<&SessionAuth> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, PlainSessions};
    use crate::storage::AuthDatabase;
    use axum::http::{header::COOKIE, HeaderValue};
    use tempfile::TempDir;

    const COOKIE_NAME: &str = "_my_session_id";

    fn setup() -> (SessionAuth, User, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = AuthDatabase::open(&dir.path().join("auth.redb")).expect("Failed to open db");
        let user = db.add_user("bob@hbtn.io", "digest").unwrap();
        let sessions = PlainSessions::new(Arc::new(MemorySessionStore::new()));
        let auth = SessionAuth::new(
            AuthType::SessionAuth,
            COOKIE_NAME,
            Arc::new(sessions),
            Arc::new(db),
        );
        (auth, user, dir)
    }

    fn cookie(session_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{COOKIE_NAME}={session_id}")).unwrap(),
        );
        headers
    }

    #[test]
    fn cookie_resolves_to_user() {
        let (auth, user, _dir) = setup();
        let session_id = auth.create_session(&user.id).unwrap().unwrap();

        let found = auth.current_user(&cookie(&session_id)).unwrap().unwrap();
        assert_eq!(found.email, "bob@hbtn.io");
        assert_eq!(
            auth.extract_auth_token(&cookie(&session_id)).as_deref(),
            Some(session_id.as_str())
        );
    }

    #[test]
    fn unknown_session_or_missing_cookie_is_a_miss() {
        let (auth, _, _dir) = setup();
        assert!(auth.current_user(&cookie("bogus")).unwrap().is_none());
        assert!(auth.current_user(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn session_for_deleted_user_is_a_miss() {
        let (auth, _, _dir) = setup();
        let session_id = auth.create_session("ghost-user").unwrap().unwrap();
        assert!(auth.current_user(&cookie(&session_id)).unwrap().is_none());
    }

    #[test]
    fn logout_destroys_session_once() {
        let (auth, user, _dir) = setup();
        let session_id = auth.create_session(&user.id).unwrap().unwrap();
        let headers = cookie(&session_id);

        assert!(auth.destroy_session(&headers).unwrap());
        assert!(!auth.destroy_session(&headers).unwrap());
        assert!(!auth.destroy_session(&HeaderMap::new()).unwrap());
        assert!(auth.current_user(&headers).unwrap().is_none());
    }

    #[test]
    fn set_cookie_uses_configured_name() {
        let (auth, _, _dir) = setup();
        assert!(auth.set_cookie_value("abc").starts_with("_my_session_id=abc;"));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP Basic authentication against the user directory.

use std::sync::Arc;

use axum::http::HeaderMap;

use super::credentials::{self, BASIC_SCHEME};
use super::{AuthError, AuthStrategy};
use crate::config::AuthType;
use crate::users::{User, UserDirectory};

/// Resolves `Authorization: Basic base64(email:password)`.
///
/// The pipeline is header → scheme → base64 → `email:password` → user
/// lookup → password check. The first stage that yields nothing ends it.
pub struct BasicAuth {
    users: Arc<dyn UserDirectory>,
    session_name: String,
}

impl BasicAuth {
    pub fn new(users: Arc<dyn UserDirectory>, session_name: impl Into<String>) -> Self {
        Self {
            users,
            session_name: session_name.into(),
        }
    }

    /// Find the user owning `email` and check `password` against it.
    pub fn user_from_credentials(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Some(user) = self.users.find_by_email(email)? else {
            return Ok(None);
        };
        if !self.users.verify_password(&user, password) {
            tracing::warn!("Basic auth rejected: wrong password");
            return Ok(None);
        }
        Ok(Some(user))
    }
}

impl AuthStrategy for BasicAuth {
    fn auth_type(&self) -> AuthType {
        AuthType::BasicAuth
    }

    fn session_name(&self) -> &str {
        &self.session_name
    }

    fn extract_auth_token(&self, headers: &HeaderMap) -> Option<String> {
        self.authorization_header(headers).map(str::to_string)
    }

    fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, AuthError> {
        let Some(header) = self.authorization_header(headers) else {
            return Ok(None);
        };
        let Some(token) = credentials::extract_scheme(header, BASIC_SCHEME) else {
            return Ok(None);
        };
        let Some(decoded) = credentials::decode_base64(token) else {
            return Ok(None);
        };
        let Some(creds) = credentials::split_credentials(&decoded) else {
            return Ok(None);
        };
        self.user_from_credentials(creds.email, creds.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::config::DEFAULT_SESSION_NAME;
    use crate::storage::AuthDatabase;
    use axum::http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderValue,
    };
    use tempfile::TempDir;

    fn setup() -> (BasicAuth, User, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = AuthDatabase::open(&dir.path().join("auth.redb")).expect("Failed to open db");
        let digest = hash_password("H0lbertonSchool98!").unwrap();
        let user = db.add_user("bob@hbtn.io", &digest).unwrap();
        (BasicAuth::new(Arc::new(db), DEFAULT_SESSION_NAME), user, dir)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(email: &str, password: &str) -> HeaderMap {
        headers_with(&format!(
            "Basic {}",
            credentials::encode_base64(&format!("{email}:{password}"))
        ))
    }

    #[test]
    fn valid_credentials_resolve_user() {
        let (auth, user, _dir) = setup();
        let found = auth
            .current_user(&basic("bob@hbtn.io", "H0lbertonSchool98!"))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[test]
    fn wrong_password_is_a_miss() {
        let (auth, _, _dir) = setup();
        assert!(auth.current_user(&basic("bob@hbtn.io", "nope")).unwrap().is_none());
    }

    #[test]
    fn unknown_email_is_a_miss() {
        let (auth, _, _dir) = setup();
        assert!(auth
            .current_user(&basic("alice@hbtn.io", "H0lbertonSchool98!"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_headers_are_misses() {
        let (auth, _, _dir) = setup();
        for header in ["Bearer xyz", "Basic", "Basic !!!", "Basic Ym9i", "basic Ym9iOng="] {
            assert!(
                auth.current_user(&headers_with(header)).unwrap().is_none(),
                "{header} should not resolve"
            );
        }
        assert!(auth.current_user(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn extract_auth_token_returns_header() {
        let (auth, _, _dir) = setup();
        assert_eq!(
            auth.extract_auth_token(&headers_with("Basic abc")).as_deref(),
            Some("Basic abc")
        );
        assert_eq!(auth.extract_auth_token(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookie_alone_resolves_nobody() {
        let (auth, _, _dir) = setup();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("_my_session_id=abc"));

        assert_eq!(auth.session_cookie(&headers), Some("abc"));
        assert!(auth.current_user(&headers).unwrap().is_none());
    }
}

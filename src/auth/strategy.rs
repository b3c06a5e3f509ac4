// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authentication strategy contract and the no-op strategy.

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};

use super::{path_matcher, session::SessionAuth, AuthError};
use crate::config::{AuthType, DEFAULT_SESSION_NAME};
use crate::users::User;

/// A pluggable way of turning request headers into a [`User`].
///
/// `current_user` never fails for malformed or unknown credentials; those
/// are `Ok(None)`. Only storage faults are returned as errors.
pub trait AuthStrategy: Send + Sync {
    fn auth_type(&self) -> AuthType;

    /// Name of the session cookie (`SESSION_NAME`).
    fn session_name(&self) -> &str;

    /// Whether `path` needs authentication given the excluded patterns.
    fn require_auth(&self, path: Option<&str>, excluded_paths: &[String]) -> bool {
        path_matcher::requires_auth(path, excluded_paths)
    }

    fn authorization_header<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        authorization_header(headers)
    }

    /// Value of the session cookie, whatever the strategy.
    fn session_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        cookie_value(headers, self.session_name())
    }

    /// The raw credential this strategy reads from the request.
    fn extract_auth_token(&self, headers: &HeaderMap) -> Option<String>;

    fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>, AuthError>;

    /// Strategies that never reject a request.
    fn permits_anonymous(&self) -> bool {
        false
    }

    /// Session lifecycle access for the login and logout endpoints.
    fn sessions(&self) -> Option<&SessionAuth> {
        None
    }
}

/// Identifies nobody.
///
/// With no `AUTH_TYPE` configured it also lets every request through. As
/// the base `auth` strategy it keeps the gate closed: requests without
/// credentials get 401 and everything else 403.
#[derive(Debug, Clone)]
pub struct NullAuth {
    auth_type: AuthType,
    session_name: String,
}

impl NullAuth {
    pub fn new(auth_type: AuthType, session_name: impl Into<String>) -> Self {
        Self {
            auth_type,
            session_name: session_name.into(),
        }
    }
}

impl Default for NullAuth {
    fn default() -> Self {
        Self::new(AuthType::None, DEFAULT_SESSION_NAME)
    }
}

impl AuthStrategy for NullAuth {
    fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    fn session_name(&self) -> &str {
        &self.session_name
    }

    fn extract_auth_token(&self, _headers: &HeaderMap) -> Option<String> {
        None
    }

    fn current_user(&self, _headers: &HeaderMap) -> Result<Option<User>, AuthError> {
        Ok(None)
    }

    fn permits_anonymous(&self) -> bool {
        self.auth_type == AuthType::None
    }
}

/// The `Authorization` header, if present and valid ASCII.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()
}

/// Value of the cookie called `name`, searching every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

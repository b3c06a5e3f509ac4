// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User records and the directory contract used by the auth layer.
//!
//! The auth strategies only ever look users up. Creation and updates go
//! through [`crate::accounts::AccountService`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password;
use crate::storage::DbResult;

/// Stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier (UUID)
    pub id: String,
    pub email: String,
    /// Argon2 PHC digest, never the plaintext
    pub hashed_password: String,
    /// Current account-service session, at most one per user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Pending password reset token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            session_id: None,
            reset_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_valid_password(&self, password: &str) -> bool {
        password::verify_password(&self.hashed_password, password)
    }
}

/// The fields of a [`User`] that may change after registration.
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub hashed_password: Option<String>,
    pub reset_token: Option<Option<String>>,
    pub session_id: Option<Option<String>>,
}

impl UserPatch {
    pub fn hashed_password(mut self, digest: impl Into<String>) -> Self {
        self.hashed_password = Some(digest.into());
        self
    }

    pub fn reset_token(mut self, token: Option<String>) -> Self {
        self.reset_token = Some(token);
        self
    }

    pub fn session_id(mut self, session_id: Option<String>) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch in place, bumping `updated_at` when anything changed.
    pub fn apply(self, user: &mut User) {
        if self.is_empty() {
            return;
        }
        if let Some(digest) = self.hashed_password {
            user.hashed_password = digest;
        }
        if let Some(token) = self.reset_token {
            user.reset_token = token;
        }
        if let Some(session_id) = self.session_id {
            user.session_id = session_id;
        }
        user.updated_at = Utc::now();
    }
}

/// Lookup and persistence of user records.
///
/// Missing users are `Ok(None)`. Only storage faults are errors.
pub trait UserDirectory: Send + Sync {
    /// Insert a new user. Fails with `AlreadyExists` for a taken email.
    fn add_user(&self, email: &str, hashed_password: &str) -> DbResult<User>;

    fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;

    fn find_by_id(&self, user_id: &str) -> DbResult<Option<User>>;

    fn find_by_session_id(&self, session_id: &str) -> DbResult<Option<User>>;

    fn find_by_reset_token(&self, reset_token: &str) -> DbResult<Option<User>>;

    /// Apply `patch` to an existing user. Fails with `NotFound` otherwise.
    fn update_user(&self, user_id: &str, patch: UserPatch) -> DbResult<User>;

    fn verify_password(&self, user: &User, password: &str) -> bool {
        user.is_valid_password(password)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account service: registration, login sessions and password reset.
//!
//! Account sessions live on the user record itself, so each user holds at
//! most one valid session. Creating a new one replaces the previous id.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::{self, PasswordError};
use crate::storage::DbError;
use crate::users::{User, UserDirectory, UserPatch};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("User {0} already exists")]
    AlreadyRegistered(String),

    #[error("No user registered for {0}")]
    UnknownEmail(String),

    #[error("Invalid reset token")]
    InvalidResetToken,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type AccountResult<T> = Result<T, AccountError>;

pub struct AccountService {
    users: Arc<dyn UserDirectory>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    pub fn register_user(&self, email: &str, password: &str) -> AccountResult<User> {
        if self.users.find_by_email(email)?.is_some() {
            return Err(AccountError::AlreadyRegistered(email.to_string()));
        }
        let digest = password::hash_password(password)?;
        let user = self.users.add_user(email, &digest)?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub fn valid_login(&self, email: &str, password: &str) -> AccountResult<bool> {
        Ok(self
            .users
            .find_by_email(email)?
            .is_some_and(|user| self.users.verify_password(&user, password)))
    }

    /// Start a session for `email`, replacing any existing one.
    ///
    /// Returns `None` for an unknown email.
    pub fn create_session(&self, email: &str) -> AccountResult<Option<String>> {
        let Some(user) = self.users.find_by_email(email)? else {
            return Ok(None);
        };
        let session_id = Uuid::new_v4().to_string();
        self.users
            .update_user(&user.id, UserPatch::default().session_id(Some(session_id.clone())))?;
        tracing::info!(user_id = %user.id, "Account session started");
        Ok(Some(session_id))
    }

    pub fn get_user_from_session_id(&self, session_id: &str) -> AccountResult<Option<User>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        Ok(self.users.find_by_session_id(session_id)?)
    }

    pub fn destroy_session(&self, user_id: &str) -> AccountResult<()> {
        self.users
            .update_user(user_id, UserPatch::default().session_id(None))?;
        tracing::info!(user_id, "Account session ended");
        Ok(())
    }

    pub fn get_reset_password_token(&self, email: &str) -> AccountResult<String> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| AccountError::UnknownEmail(email.to_string()))?;
        let token = Uuid::new_v4().to_string();
        self.users
            .update_user(&user.id, UserPatch::default().reset_token(Some(token.clone())))?;
        Ok(token)
    }

    /// Set a new password for the holder of `reset_token` and consume the token.
    pub fn update_password(&self, reset_token: &str, new_password: &str) -> AccountResult<()> {
        if reset_token.is_empty() {
            return Err(AccountError::InvalidResetToken);
        }
        let user = self
            .users
            .find_by_reset_token(reset_token)?
            .ok_or(AccountError::InvalidResetToken)?;
        let digest = password::hash_password(new_password)?;
        self.users.update_user(
            &user.id,
            UserPatch::default().hashed_password(digest).reset_token(None),
        )?;
        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }
}

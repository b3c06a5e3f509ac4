// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated user.
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     // user is crate::users::User
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::AuthError;
use crate::state::AppState;
use crate::users::User;

/// The user behind the current request.
///
/// Reuses the user the gate middleware resolved when present, otherwise
/// asks the configured strategy directly.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>().cloned() {
            return Ok(CurrentUser(user));
        }

        let auth = &state.auth;
        let headers = &parts.headers;
        if auth.authorization_header(headers).is_none() && auth.session_cookie(headers).is_none() {
            return Err(AuthError::MissingCredentials);
        }

        auth.current_user(headers)?
            .map(CurrentUser)
            .ok_or(AuthError::Forbidden)
    }
}

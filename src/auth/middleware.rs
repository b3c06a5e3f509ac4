// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! ```rust,ignore
//! let api = Router::new()
//!     .route("/users/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), auth_gate));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthError;
use crate::state::AppState;

/// Rejects requests that need a user but do not identify one.
///
/// Anonymous strategies and excluded paths pass straight through. Without
/// an Authorization header or session cookie the request gets 401; with
/// credentials that resolve to nobody it gets 403. A resolved [`User`] is
/// placed in the request extensions.
///
/// [`User`]: crate::users::User
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth = &state.auth;
    if auth.permits_anonymous() {
        return next.run(request).await;
    }

    let path = request.uri().path();
    if !auth.require_auth(Some(path), &state.excluded_paths) {
        return next.run(request).await;
    }

    let headers = request.headers();
    if auth.authorization_header(headers).is_none() && auth.session_cookie(headers).is_none() {
        return AuthError::MissingCredentials.into_response();
    }

    match auth.current_user(headers) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => AuthError::Forbidden.into_response(),
        Err(e) => e.into_response(),
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session login and logout for the cookie-based strategies.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};

use crate::error::ApiError;
use crate::models::{non_empty, LoginForm, LogoutResponse, UserResponse};
use crate::state::AppState;

/// Log in with email and password and receive a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth_session/login",
    tag = "Session",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in, session cookie set", body = UserResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown email or session login disabled"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let Some(sessions) = state.auth.sessions() else {
        return Err(ApiError::not_found("Not found"));
    };
    let email = non_empty(&form.email).ok_or_else(|| ApiError::bad_request("email missing"))?;
    let password =
        non_empty(&form.password).ok_or_else(|| ApiError::bad_request("password missing"))?;

    let user = state
        .users
        .find_by_email(email)?
        .ok_or_else(|| ApiError::not_found("no user found for this email"))?;
    if !state.users.verify_password(&user, password) {
        tracing::warn!(user_id = %user.id, "Session login rejected: wrong password");
        return Err(ApiError::unauthorized("wrong password"));
    }

    let session_id = sessions
        .create_session(&user.id)?
        .ok_or_else(|| ApiError::internal("Could not create session"))?;
    let cookie = sessions.set_cookie_value(&session_id);

    Ok(([(SET_COOKIE, cookie)], Json(UserResponse::from(user))).into_response())
}

/// Destroy the session named by the request cookie.
#[utoipa::path(
    delete,
    path = "/api/v1/auth_session/logout",
    tag = "Session",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 404, description = "No session to destroy"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let Some(sessions) = state.auth.sessions() else {
        return Err(ApiError::not_found("Not found"));
    };
    if !sessions.destroy_session(&headers)? {
        return Err(ApiError::not_found("Not found"));
    }
    Ok(Json(LogoutResponse {}))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login, profile and password reset.
//!
//! These routes sit outside the auth gate and track logins with their own
//! `session_id` cookie stored on the user record.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use crate::auth::strategy::cookie_value;
use crate::error::ApiError;
use crate::models::{
    non_empty, AccountMessage, LoginForm, MessageResponse, ProfileResponse, ResetPasswordForm,
    ResetTokenResponse, UpdatePasswordForm,
};
use crate::state::AppState;
use crate::users::User;

/// Cookie carrying the account session id.
pub const ACCOUNT_COOKIE: &str = "session_id";

fn account_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let session_id = cookie_value(headers, ACCOUNT_COOKIE).ok_or_else(|| ApiError::forbidden("Forbidden"))?;
    state
        .accounts
        .get_user_from_session_id(session_id)?
        .ok_or_else(|| ApiError::forbidden("Forbidden"))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Accounts",
    responses((status = 200, description = "Welcome message", body = MessageResponse))
)]
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Bienvenue".to_string(),
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Accounts",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User created", body = AccountMessage),
        (status = 400, description = "Missing fields or email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<(StatusCode, Json<AccountMessage>), ApiError> {
    let (Some(email), Some(password)) = (non_empty(&form.email), non_empty(&form.password)) else {
        return Err(ApiError::bad_request("Missing email or password"));
    };
    let user = state.accounts.register_user(email, password)?;
    Ok((
        StatusCode::CREATED,
        Json(AccountMessage::new(user.email, "user created")),
    ))
}

/// Log in and receive the account session cookie.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Accounts",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in", body = AccountMessage),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let (Some(email), Some(password)) = (non_empty(&form.email), non_empty(&form.password)) else {
        return Err(ApiError::bad_request("Missing email or password"));
    };
    if !state.accounts.valid_login(email, password)? {
        tracing::warn!("Account login rejected");
        return Err(ApiError::unauthorized("Unauthorized"));
    }
    let session_id = state
        .accounts
        .create_session(email)?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let cookie = format!("{ACCOUNT_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    Ok(([(SET_COOKIE, cookie)], Json(AccountMessage::new(email, "logged in"))).into_response())
}

/// Log out and go back to `/`.
#[utoipa::path(
    delete,
    path = "/sessions",
    tag = "Accounts",
    responses(
        (status = 303, description = "Logged out, redirected to /"),
        (status = 403, description = "No valid session"),
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let user = account_user(&state, &headers)?;
    state.accounts.destroy_session(&user.id)?;

    let cleared = format!("{ACCOUNT_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    Ok(([(SET_COOKIE, cleared)], Redirect::to("/")).into_response())
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Accounts",
    responses(
        (status = 200, description = "Profile of the logged-in user", body = ProfileResponse),
        (status = 403, description = "No valid session"),
    )
)]
pub async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ProfileResponse>, ApiError> {
    let user = account_user(&state, &headers)?;
    Ok(Json(ProfileResponse { email: user.email }))
}

/// Issue a password reset token.
#[utoipa::path(
    post,
    path = "/reset_password",
    tag = "Accounts",
    request_body(content = ResetPasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reset token issued", body = ResetTokenResponse),
        (status = 400, description = "Missing email"),
        (status = 403, description = "Email not registered"),
    )
)]
pub async fn reset_password_token(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Json<ResetTokenResponse>, ApiError> {
    let email = non_empty(&form.email).ok_or_else(|| ApiError::bad_request("Missing email"))?;
    let reset_token = state.accounts.get_reset_password_token(email)?;
    Ok(Json(ResetTokenResponse {
        email: email.to_string(),
        reset_token,
    }))
}

/// Set a new password using a reset token.
#[utoipa::path(
    put,
    path = "/reset_password",
    tag = "Accounts",
    request_body(content = UpdatePasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Password updated", body = AccountMessage),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Invalid reset token"),
    )
)]
pub async fn update_password(
    State(state): State<AppState>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Json<AccountMessage>, ApiError> {
    let (Some(email), Some(token), Some(new_password)) = (
        non_empty(&form.email),
        non_empty(&form.reset_token),
        non_empty(&form.new_password),
    ) else {
        return Err(ApiError::bad_request(
            "Missing email, reset_token, or new_password",
        ));
    };
    state.accounts.update_password(token, new_password)?;
    Ok(Json(AccountMessage::new(email, "Password updated")))
}

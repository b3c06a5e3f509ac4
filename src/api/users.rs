// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::CurrentUser;
use crate::models::UserResponse;

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("basic" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "No credentials sent"),
        (status = 403, description = "Credentials do not identify a user"),
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

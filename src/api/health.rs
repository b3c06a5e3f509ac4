// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Status and error endpoints. All three are excluded from the
//! auth gate by default.

use axum::Json;

use crate::error::ApiError;
use crate::models::StatusResponse;

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Status",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse)
    )
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// Always answers 401, for clients exercising their error handling.
#[utoipa::path(
    get,
    path = "/api/v1/unauthorized",
    tag = "Status",
    responses(
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn unauthorized() -> ApiError {
    ApiError::unauthorized("Unauthorized")
}

/// Always answers 403.
#[utoipa::path(
    get,
    path = "/api/v1/forbidden",
    tag = "Status",
    responses(
        (status = 403, description = "Forbidden")
    )
)]
pub async fn forbidden() -> ApiError {
    ApiError::forbidden("Forbidden")
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::auth_gate,
    error::ApiError,
    models::{
        AccountMessage, LoginForm, LogoutResponse, MessageResponse, ProfileResponse,
        ResetPasswordForm, ResetTokenResponse, StatusResponse, UpdatePasswordForm, UserResponse,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod session_auth;
pub mod users;

pub fn router(state: AppState) -> Router {
    // route_layer keeps unmatched paths out of the gate so they fall through to 404
    let v1_routes = Router::new()
        .route("/api/v1/status", get(health::status))
        .route("/api/v1/unauthorized", get(health::unauthorized))
        .route("/api/v1/forbidden", get(health::forbidden))
        .route("/api/v1/users/me", get(users::get_current_user))
        .route("/api/v1/auth_session/login", post(session_auth::login))
        .route("/api/v1/auth_session/logout", delete(session_auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .with_state(state.clone());

    let account_routes = Router::new()
        .route("/", get(accounts::welcome))
        .route("/users", post(accounts::register))
        .route("/sessions", post(accounts::login).delete(accounts::logout))
        .route("/profile", get(accounts::profile))
        .route(
            "/reset_password",
            post(accounts::reset_password_token).put(accounts::update_password),
        )
        .with_state(state);

    Router::new()
        .merge(v1_routes)
        .merge(account_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::status,
        health::unauthorized,
        health::forbidden,
        users::get_current_user,
        session_auth::login,
        session_auth::logout,
        accounts::welcome,
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::profile,
        accounts::reset_password_token,
        accounts::update_password
    ),
    components(
        schemas(
            StatusResponse,
            UserResponse,
            LoginForm,
            LogoutResponse,
            MessageResponse,
            AccountMessage,
            ProfileResponse,
            ResetPasswordForm,
            ResetTokenResponse,
            UpdatePasswordForm
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Status", description = "Liveness and error status endpoints"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Session", description = "Session cookie login and logout"),
        (name = "Accounts", description = "Registration, profile and password reset")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                crate::config::DEFAULT_SESSION_NAME,
            ))),
        );
    }
}

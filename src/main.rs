// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use relational_auth_server::{
    api::router,
    config::ServerConfig,
    state::AppState,
    storage::{AuthDatabase, StoragePaths},
    telemetry,
};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();
    telemetry::init_tracing(config.log_format);

    let paths = StoragePaths::new(&config.data_dir);
    std::fs::create_dir_all(paths.root()).expect("Failed to create data directory");
    let db = AuthDatabase::open(&paths.auth_db()).expect("Failed to open auth database");

    let state = AppState::new(&config.auth, Arc::new(db));
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(
        %addr,
        auth_type = %config.auth.auth_type,
        "Relational Auth server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

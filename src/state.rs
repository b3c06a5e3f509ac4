// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::accounts::AccountService;
use crate::auth::{build_strategy, AuthStrategy};
use crate::config::AuthConfig;
use crate::storage::AuthDatabase;
use crate::users::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthStrategy>,
    pub users: Arc<dyn UserDirectory>,
    pub accounts: Arc<AccountService>,
    /// Glob patterns the auth gate lets through
    pub excluded_paths: Arc<[String]>,
}

impl AppState {
    pub fn new(config: &AuthConfig, db: Arc<AuthDatabase>) -> Self {
        let users: Arc<dyn UserDirectory> = db.clone();
        Self {
            auth: build_strategy(config, db),
            accounts: Arc::new(AccountService::new(users.clone())),
            users,
            excluded_paths: config.excluded_paths.clone().into(),
        }
    }
}

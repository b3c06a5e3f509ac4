// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage
//!
//! Users and database-backed sessions live in a single redb file under the
//! configured data directory. Sessions of the in-memory strategies never
//! touch this module.

pub mod database;
pub mod paths;

pub use database::{AuthDatabase, DbError, DbResult, UserSession};
pub use paths::StoragePaths;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Session Authentication Service
//!
//! Pluggable request authentication for an Axum API, plus a small user
//! account service.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Strategies, path exclusion, credential decoding and the gate
//! - `session` - Session lifecycle engines and their stores
//! - `accounts` - Registration, account sessions and password reset
//! - `storage` - User and session persistence (redb)

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod users;

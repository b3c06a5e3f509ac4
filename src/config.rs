// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! typed configuration built from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH_TYPE` | `auth`, `basic_auth`, `session_auth`, `session_exp_auth`, `session_db_auth` | unset (no authentication) |
//! | `SESSION_NAME` | Session cookie name | `_my_session_id` |
//! | `SESSION_DURATION` | Session lifetime in seconds, `0` = never expires | `0` |
//! | `AUTH_EXCLUDED_PATHS` | Comma separated glob patterns exempt from auth | status/unauthorized/forbidden/login |
//! | `DATA_DIR` | Directory holding the redb database | `./data` |
//! | `API_HOST` | Server bind address | `0.0.0.0` |
//! | `API_PORT` | Server bind port | `5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

/// Selects the authentication strategy.
pub const AUTH_TYPE_ENV: &str = "AUTH_TYPE";

/// Name of the cookie carrying the session id.
pub const SESSION_NAME_ENV: &str = "SESSION_NAME";

/// Session lifetime in seconds for the expiring strategies.
///
/// Values that do not parse as an integer are treated as `0`.
pub const SESSION_DURATION_ENV: &str = "SESSION_DURATION";

/// Override for the excluded path patterns.
pub const EXCLUDED_PATHS_ENV: &str = "AUTH_EXCLUDED_PATHS";

/// Directory holding the redb database file.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const HOST_ENV: &str = "API_HOST";

pub const PORT_ENV: &str = "API_PORT";

/// `json` for structured logs, anything else for human-readable output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_SESSION_NAME: &str = "_my_session_id";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Paths reachable without credentials.
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
];

/// Authentication strategy selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    /// No gate at all (unset or unknown `AUTH_TYPE`).
    #[default]
    None,
    /// Base strategy: gate stays on, nobody is ever identified.
    Auth,
    BasicAuth,
    SessionAuth,
    SessionExpAuth,
    SessionDbAuth,
}

impl AuthType {
    /// Parse an `AUTH_TYPE` value. Unknown values disable authentication.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "auth" => AuthType::Auth,
            "basic_auth" => AuthType::BasicAuth,
            "session_auth" => AuthType::SessionAuth,
            "session_exp_auth" => AuthType::SessionExpAuth,
            "session_db_auth" => AuthType::SessionDbAuth,
            _ => AuthType::None,
        }
    }

    pub fn is_session_based(&self) -> bool {
        matches!(
            self,
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth
        )
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthType::None => write!(f, "none"),
            AuthType::Auth => write!(f, "auth"),
            AuthType::BasicAuth => write!(f, "basic_auth"),
            AuthType::SessionAuth => write!(f, "session_auth"),
            AuthType::SessionExpAuth => write!(f, "session_exp_auth"),
            AuthType::SessionDbAuth => write!(f, "session_db_auth"),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub auth_type: AuthType,
    pub session_name: String,
    /// Seconds; `<= 0` disables expiry
    pub session_duration_secs: i64,
    pub excluded_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthType::None,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            session_duration_secs: 0,
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl AuthConfig {
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type,
            ..Self::default()
        }
    }

    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    pub fn with_session_duration(mut self, seconds: i64) -> Self {
        self.session_duration_secs = seconds;
        self
    }
}

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let auth_type = lookup(AUTH_TYPE_ENV)
            .map(|v| AuthType::parse(&v))
            .unwrap_or_default();

        let session_name = lookup(SESSION_NAME_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string());

        let session_duration_secs = lookup(SESSION_DURATION_ENV)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let excluded_paths = match lookup(EXCLUDED_PATHS_ENV) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None => AuthConfig::default().excluded_paths,
        };

        let port = lookup(PORT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: PathBuf::from(lookup(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            log_format,
            auth: AuthConfig {
                auth_type,
                session_name,
                session_duration_secs,
                excluded_paths,
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.auth.auth_type, AuthType::None);
        assert_eq!(config.auth.session_name, DEFAULT_SESSION_NAME);
        assert_eq!(config.auth.session_duration_secs, 0);
        assert_eq!(config.auth.excluded_paths.len(), DEFAULT_EXCLUDED_PATHS.len());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn parses_auth_settings() {
        let config = config_from(&[
            (AUTH_TYPE_ENV, "session_exp_auth"),
            (SESSION_NAME_ENV, "sid"),
            (SESSION_DURATION_ENV, "60"),
            (EXCLUDED_PATHS_ENV, "/public*, /health/ ,"),
            (LOG_FORMAT_ENV, "json"),
        ]);
        assert_eq!(config.auth.auth_type, AuthType::SessionExpAuth);
        assert_eq!(config.auth.session_name, "sid");
        assert_eq!(config.auth.session_duration_secs, 60);
        assert_eq!(config.auth.excluded_paths, vec!["/public*", "/health/"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_duration_means_never_expire() {
        let config = config_from(&[(SESSION_DURATION_ENV, "ten minutes")]);
        assert_eq!(config.auth.session_duration_secs, 0);
    }

    #[test]
    fn auth_type_parsing() {
        assert_eq!(AuthType::parse("basic_auth"), AuthType::BasicAuth);
        assert_eq!(AuthType::parse("session_db_auth"), AuthType::SessionDbAuth);
        assert_eq!(AuthType::parse("auth"), AuthType::Auth);
        assert_eq!(AuthType::parse("jwt"), AuthType::None);
        assert!(AuthType::SessionAuth.is_session_based());
        assert!(!AuthType::BasicAuth.is_session_based());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-disk storage layout.
//!
//! ```text
//! {DATA_DIR}/
//!   auth.redb     # users, email index, persisted sessions
//! ```

use std::path::{Path, PathBuf};

/// File name of the redb database inside the data directory.
pub const AUTH_DB_FILE: &str = "auth.redb";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the auth database file.
    pub fn auth_db(&self) -> PathBuf {
        self.root.join(AUTH_DB_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_layout() {
        let paths = StoragePaths::new(crate::config::DEFAULT_DATA_DIR);
        assert_eq!(paths.root(), Path::new("./data"));
        assert_eq!(paths.auth_db(), PathBuf::from("./data/auth.redb"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.auth_db(), PathBuf::from("/tmp/test-data/auth.redb"));
    }
}

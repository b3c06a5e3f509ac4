// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded auth database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized User
//! - `user_email_index`: email → user_id
//! - `user_sessions`: record id → serialized UserSession

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::{User, UserDirectory, UserPatch};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized User (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: email → user_id. Enforces one account per email.
const USER_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_email_index");

/// Persisted sessions: record id → serialized UserSession (JSON bytes).
const USER_SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_sessions");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Records
// =============================================================================

/// A session persisted by the database-backed session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSession {
    /// Record identifier (UUID), distinct from the session id
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            created_at,
        }
    }
}

// =============================================================================
// AuthDatabase
// =============================================================================

/// Embedded ACID store for users and persisted sessions.
pub struct AuthDatabase {
    db: Database,
}

impl AuthDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAIL_INDEX)?;
            let _ = write_txn.open_table(USER_SESSIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user and its email index entry in one transaction.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut index = write_txn.open_table(USER_EMAIL_INDEX)?;
            if index.get(user.email.as_str())?.is_some() {
                return Err(DbError::AlreadyExists(format!("User {}", user.email)));
            }
            index.insert(user.email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a single user by id.
    pub fn get_user(&self, user_id: &str) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user through the email index.
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USER_EMAIL_INDEX)?;
        let Some(user_id) = index.get(email)? else {
            return Ok(None);
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.value())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// First user matching `predicate`, by full table scan.
    pub fn find_user(&self, predicate: impl Fn(&User) -> bool) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        for entry in table.iter()? {
            let (_, value) = entry?;
            let user: User = serde_json::from_slice(value.value())?;
            if predicate(&user) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Read-modify-write a user inside a single write transaction.
    pub fn patch_user(&self, user_id: &str, patch: UserPatch) -> DbResult<User> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut users = write_txn.open_table(USERS)?;
            let mut user: User = match users.get(user_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(DbError::NotFound(format!("User {user_id}"))),
            };
            patch.apply(&mut user);
            let json = serde_json::to_vec(&user)?;
            users.insert(user_id, json.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    // =========================================================================
    // Persisted Sessions
    // =========================================================================

    /// Persist a session record. The `session_id` uniqueness check runs in
    /// the same write transaction as the insert.
    pub fn insert_user_session(&self, session: &UserSession) -> DbResult<()> {
        let json = serde_json::to_vec(session)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USER_SESSIONS)?;
            let mut taken = false;
            for entry in table.iter()? {
                let (_, value) = entry?;
                let existing: UserSession = serde_json::from_slice(value.value())?;
                if existing.session_id == session.session_id {
                    taken = true;
                    break;
                }
            }
            if taken {
                return Err(DbError::AlreadyExists(format!("Session {}", session.session_id)));
            }
            table.insert(session.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete every record carrying `session_id`. Returns how many were removed.
    pub fn delete_user_sessions(&self, session_id: &str) -> DbResult<usize> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(USER_SESSIONS)?;
            let mut doomed = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let session: UserSession = serde_json::from_slice(value.value())?;
                if session.session_id == session_id {
                    doomed.push(key.value().to_string());
                }
            }
            for key in &doomed {
                table.remove(key.as_str())?;
            }
            doomed.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Every persisted session record.
    pub fn all_user_sessions(&self) -> DbResult<Vec<UserSession>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USER_SESSIONS)?;
        let mut sessions = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            sessions.push(serde_json::from_slice(value.value())?);
        }
        Ok(sessions)
    }
}

impl UserDirectory for AuthDatabase {
    fn add_user(&self, email: &str, hashed_password: &str) -> DbResult<User> {
        let user = User::new(Uuid::new_v4().to_string(), email, hashed_password);
        self.insert_user(&user)?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.get_user_by_email(email)
    }

    fn find_by_id(&self, user_id: &str) -> DbResult<Option<User>> {
        self.get_user(user_id)
    }

    fn find_by_session_id(&self, session_id: &str) -> DbResult<Option<User>> {
        self.find_user(|user| user.session_id.as_deref() == Some(session_id))
    }

    fn find_by_reset_token(&self, reset_token: &str) -> DbResult<Option<User>> {
        self.find_user(|user| user.reset_token.as_deref() == Some(reset_token))
    }

    fn update_user(&self, user_id: &str, patch: UserPatch) -> DbResult<User> {
        self.patch_user(user_id, patch)
    }
}

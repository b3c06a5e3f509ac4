// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store persisted in the redb `user_sessions` table.
//!
//! Lookups scan the whole table for a matching `session_id`. The table is
//! expected to stay small, so there is no secondary index.

use std::sync::Arc;

use super::{SessionError, SessionRecord, SessionResult, SessionStore};
use crate::storage::{AuthDatabase, DbError, UserSession};

pub struct DatabaseSessionStore {
    db: Arc<AuthDatabase>,
}

impl DatabaseSessionStore {
    pub fn new(db: Arc<AuthDatabase>) -> Self {
        Self { db }
    }

    fn find_row(&self, session_id: &str) -> SessionResult<Option<UserSession>> {
        let sessions = self.db.all_user_sessions()?;
        Ok(sessions
            .into_iter()
            .find(|session| session.session_id == session_id))
    }
}

impl SessionStore for DatabaseSessionStore {
    fn insert(&self, record: SessionRecord) -> SessionResult<()> {
        let row = UserSession::new(record.user_id, record.session_id, record.created_at);
        match self.db.insert_user_session(&row) {
            Ok(()) => Ok(()),
            Err(DbError::AlreadyExists(_)) => Err(SessionError::Collision(row.session_id)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist session");
                Err(SessionError::from(e))
            }
        }
    }

    fn find(&self, session_id: &str) -> SessionResult<Option<SessionRecord>> {
        Ok(self.find_row(session_id)?.map(|row| SessionRecord {
            session_id: row.session_id,
            user_id: row.user_id,
            created_at: row.created_at,
        }))
    }

    fn remove(&self, session_id: &str) -> SessionResult<bool> {
        Ok(self.db.delete_user_sessions(session_id)? > 0)
    }
}

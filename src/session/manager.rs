// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session engines.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use super::{Clock, SessionLifecycle, SessionRecord, SessionResult, SessionStore, SystemClock};

/// Sessions that live until destroyed.
#[derive(Clone)]
pub struct PlainSessions {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl PlainSessions {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The stored record for `session_id`, with no expiry applied.
    pub fn record(&self, session_id: &str) -> SessionResult<Option<SessionRecord>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        self.store.find(session_id)
    }
}

impl SessionLifecycle for PlainSessions {
    fn create(&self, user_id: &str) -> SessionResult<Option<String>> {
        if user_id.is_empty() {
            return Ok(None);
        }

        let record = SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: self.clock.now(),
        };
        let session_id = record.session_id.clone();
        self.store.insert(record)?;

        tracing::debug!(user_id, "Session created");
        Ok(Some(session_id))
    }

    fn lookup(&self, session_id: &str) -> SessionResult<Option<String>> {
        Ok(self.record(session_id)?.map(|record| record.user_id))
    }

    fn destroy(&self, session_id: &str) -> SessionResult<bool> {
        if session_id.is_empty() {
            return Ok(false);
        }
        let removed = self.store.remove(session_id)?;
        if removed {
            tracing::debug!("Session destroyed");
        }
        Ok(removed)
    }
}

/// Sessions that lapse `duration_secs` after creation.
///
/// A duration of zero or less disables expiry, as does one too large to
/// represent. Expired records stay in the store until destroyed; they are
/// simply never returned.
#[derive(Clone)]
pub struct ExpiringSessions {
    inner: PlainSessions,
    lifetime: Option<Duration>,
}

impl ExpiringSessions {
    pub fn new(inner: PlainSessions, duration_secs: i64) -> Self {
        let lifetime = if duration_secs > 0 {
            Duration::try_seconds(duration_secs)
        } else {
            None
        };
        if duration_secs > 0 && lifetime.is_none() {
            tracing::warn!(duration_secs, "Session duration out of range, sessions will not expire");
        }
        Self { inner, lifetime }
    }

    fn is_expired(&self, record: &SessionRecord) -> bool {
        let Some(lifetime) = self.lifetime else {
            return false;
        };
        let age = self.inner.clock().now() - record.created_at;
        age > lifetime
    }
}

impl SessionLifecycle for ExpiringSessions {
    fn create(&self, user_id: &str) -> SessionResult<Option<String>> {
        self.inner.create(user_id)
    }

    fn lookup(&self, session_id: &str) -> SessionResult<Option<String>> {
        match self.inner.record(session_id)? {
            Some(record) if !self.is_expired(&record) => Ok(Some(record.user_id)),
            Some(_) => {
                tracing::debug!("Session expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn destroy(&self, session_id: &str) -> SessionResult<bool> {
        self.inner.destroy(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::clock::ManualClock;
    use crate::session::MemorySessionStore;
    use std::collections::HashSet;

    fn plain() -> (PlainSessions, Arc<MemorySessionStore>, Arc<ManualClock>) {
        let store = Arc::new(MemorySessionStore::new());
        let clock = Arc::new(ManualClock::new());
        let sessions = PlainSessions::with_clock(store.clone(), clock.clone());
        (sessions, store, clock)
    }

    #[test]
    fn create_then_lookup() {
        let (sessions, _, _) = plain();
        let id = sessions.create("42").unwrap().unwrap();
        assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn empty_user_id_creates_nothing() {
        let (sessions, store, _) = plain();
        assert_eq!(sessions.create("").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_or_empty_id_is_absent() {
        let (sessions, _, _) = plain();
        assert_eq!(sessions.lookup("").unwrap(), None);
        assert_eq!(sessions.lookup("no-such-session").unwrap(), None);
    }

    #[test]
    fn ten_thousand_ids_are_distinct() {
        let (sessions, store, _) = plain();
        let ids: HashSet<String> = (0..10_000)
            .map(|_| sessions.create("user").unwrap().unwrap())
            .collect();
        assert_eq!(ids.len(), 10_000);
        assert_eq!(store.len(), 10_000);
    }

    #[test]
    fn destroy_is_idempotent() {
        let (sessions, _, _) = plain();
        let id = sessions.create("42").unwrap().unwrap();

        assert!(sessions.destroy(&id).unwrap());
        assert!(!sessions.destroy(&id).unwrap());
        assert!(!sessions.destroy("").unwrap());
        assert_eq!(sessions.lookup(&id).unwrap(), None);
    }

    #[test]
    fn plain_sessions_never_expire() {
        let (sessions, _, clock) = plain();
        let id = sessions.create("42").unwrap().unwrap();
        clock.advance(Duration::days(365));
        assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn expiring_session_valid_before_duration_absent_after() {
        let (inner, store, clock) = plain();
        let sessions = ExpiringSessions::new(inner, 60);
        let id = sessions.create("42").unwrap().unwrap();

        clock.advance(Duration::seconds(59));
        assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));

        clock.advance(Duration::seconds(2));
        assert_eq!(sessions.lookup(&id).unwrap(), None);

        // Lazy expiration leaves the record in place.
        assert_eq!(store.len(), 1);
        assert!(sessions.destroy(&id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn session_exactly_at_duration_is_still_valid() {
        let (inner, _, clock) = plain();
        let sessions = ExpiringSessions::new(inner, 60);
        let id = sessions.create("42").unwrap().unwrap();

        clock.advance(Duration::seconds(60));
        assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn non_positive_duration_never_expires() {
        for duration in [0, -5] {
            let (inner, _, clock) = plain();
            let sessions = ExpiringSessions::new(inner, duration);
            let id = sessions.create("42").unwrap().unwrap();
            clock.advance(Duration::days(30));
            assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
        }
    }

    #[test]
    fn unrepresentable_duration_never_expires() {
        for duration in [i64::MAX, i64::MAX / 1000 + 1] {
            let (inner, _, clock) = plain();
            let sessions = ExpiringSessions::new(inner, duration);
            let id = sessions.create("42").unwrap().unwrap();
            assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
            clock.advance(Duration::days(365 * 100));
            assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
        }
    }

    #[test]
    fn largest_representable_duration_still_applies() {
        let (inner, _, clock) = plain();
        let sessions = ExpiringSessions::new(inner, i64::MAX / 1000);
        let id = sessions.create("42").unwrap().unwrap();
        clock.advance(Duration::days(365));
        assert_eq!(sessions.lookup(&id).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn expiring_create_rejects_empty_user() {
        let (inner, _, _) = plain();
        let sessions = ExpiringSessions::new(inner, 60);
        assert_eq!(sessions.create("").unwrap(), None);
    }
}

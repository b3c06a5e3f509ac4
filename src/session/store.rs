// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session storage contract and the in-process implementation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{SessionError, SessionRecord, SessionResult};

/// Owner of the `session_id → SessionRecord` mapping.
pub trait SessionStore: Send + Sync {
    /// Insert a new record. An occupied id is a `Collision`, never overwritten.
    fn insert(&self, record: SessionRecord) -> SessionResult<()>;

    fn find(&self, session_id: &str) -> SessionResult<Option<SessionRecord>>;

    /// Remove a record, reporting whether one existed.
    fn remove(&self, session_id: &str) -> SessionResult<bool>;
}

/// Process-wide session map shared by reference between requests.
///
/// All access goes through one mutex, so concurrent create/lookup/destroy
/// never lose updates.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionRecord>> {
        // A panic while holding the lock cannot leave the map half-written,
        // every mutation is a single HashMap call.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, record: SessionRecord) -> SessionResult<()> {
        match self.lock().entry(record.session_id.clone()) {
            Entry::Occupied(entry) => Err(SessionError::Collision(entry.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn find(&self, session_id: &str) -> SessionResult<Option<SessionRecord>> {
        Ok(self.lock().get(session_id).cloned())
    }

    fn remove(&self, session_id: &str) -> SessionResult<bool> {
        Ok(self.lock().remove(session_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn record(session_id: &str, user_id: &str) -> SessionRecord {
        SessionRecord {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_find_remove() {
        let store = MemorySessionStore::new();
        store.insert(record("s-1", "u-1")).unwrap();

        assert_eq!(store.find("s-1").unwrap().unwrap().user_id, "u-1");
        assert!(store.find("s-2").unwrap().is_none());

        assert!(store.remove("s-1").unwrap());
        assert!(!store.remove("s-1").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn existing_id_is_never_overwritten() {
        let store = MemorySessionStore::new();
        store.insert(record("s-1", "u-1")).unwrap();

        let result = store.insert(record("s-1", "u-2"));
        assert!(matches!(result, Err(SessionError::Collision(id)) if id == "s-1"));
        assert_eq!(store.find("s-1").unwrap().unwrap().user_id, "u-1");
    }

    #[test]
    fn concurrent_inserts_are_all_kept() {
        let store = Arc::new(MemorySessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..250 {
                        store
                            .insert(record(&format!("s-{worker}-{i}"), "u"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 2000);
    }
}

//! Per-session mutual exclusion.
//!
//! Every mutating orchestrator operation runs `{read durable -> mutate ->
//! write durable -> write ephemeral}` while holding the owning session's
//! lock. Locks are keyed by session id; no cross-session lock is ever held,
//! so one session's oracle call cannot block another session's rounds.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for a session id.
    pub fn lock_for(&self, session_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

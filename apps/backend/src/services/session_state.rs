//! Ephemeral per-session state and the session state store port.
//!
//! The store holds fast-changing state (status, current round, running
//! scores) plus the active-user set used for capacity admission. It is a
//! cache: durable rounds are the source of truth and the orchestrator can
//! rebuild any entry from the latest `GameRound`.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    InProgress,
    Completed,
}

/// Ephemeral session state, keyed by session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub current_round: u8,
    pub user_score: i32,
    pub ai_score: i32,
}

impl SessionState {
    /// State of a session that exists but has not started.
    pub fn created() -> Self {
        Self {
            status: SessionStatus::Created,
            current_round: 0,
            user_score: 0,
            ai_score: 0,
        }
    }

    pub fn in_progress(current_round: u8, user_score: i32, ai_score: i32) -> Self {
        Self {
            status: SessionStatus::InProgress,
            current_round,
            user_score,
            ai_score,
        }
    }

    pub fn completed(current_round: u8, user_score: i32, ai_score: i32) -> Self {
        Self {
            status: SessionStatus::Completed,
            current_round,
            user_score,
            ai_score,
        }
    }
}

/// Session state store port.
///
/// `set` is a full overwrite with last-writer-wins semantics; the
/// orchestrator serializes writes per session id. Active-user operations are
/// idempotent: adding twice or removing a non-member is a no-op.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: i64) -> Result<Option<SessionState>, DomainError>;
    async fn set(&self, session_id: i64, state: SessionState) -> Result<(), DomainError>;
    async fn delete(&self, session_id: i64) -> Result<(), DomainError>;

    async fn add_active_user(&self, user_id: i64) -> Result<(), DomainError>;
    async fn remove_active_user(&self, user_id: i64) -> Result<(), DomainError>;
    async fn active_user_count(&self) -> Result<u64, DomainError>;
}

const ACTIVE_USERS_KEY: &str = "active_users";

fn session_key(session_id: i64) -> String {
    format!("session:{session_id}")
}

/// Redis-backed session store (production).
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self, DomainError> {
        let client = Client::open(redis_url)
            .map_err(|err| DomainError::state_store(format!("invalid REDIS_URL: {err}")))?;

        let conn = ConnectionManager::new(client).await.map_err(|err| {
            DomainError::state_store(format!("unable to initialize Redis connection: {err}"))
        })?;

        Ok(Self { conn })
    }
}

fn redis_err(err: redis::RedisError) -> DomainError {
    DomainError::state_store(err.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: i64) -> Result<Option<SessionState>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(session_key(session_id)).await.map_err(redis_err)?;
        match raw {
            None => Ok(None),
            Some(json) => {
                let state = serde_json::from_str(&json).map_err(|err| {
                    DomainError::state_store(format!(
                        "corrupt session state for session {session_id}: {err}"
                    ))
                })?;
                Ok(Some(state))
            }
        }
    }

    async fn set(&self, session_id: i64, state: SessionState) -> Result<(), DomainError> {
        let json = serde_json::to_string(&state)
            .map_err(|err| DomainError::state_store(err.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(session_key(session_id), json)
            .await
            .map_err(redis_err)
    }

    async fn delete(&self, session_id: i64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(session_id))
            .await
            .map_err(redis_err)
    }

    async fn add_active_user(&self, user_id: i64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(ACTIVE_USERS_KEY, user_id)
            .await
            .map_err(redis_err)
    }

    async fn remove_active_user(&self, user_id: i64) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(ACTIVE_USERS_KEY, user_id)
            .await
            .map_err(redis_err)
    }

    async fn active_user_count(&self) -> Result<u64, DomainError> {
        let mut conn = self.conn.clone();
        conn.scard(ACTIVE_USERS_KEY).await.map_err(redis_err)
    }
}

/// In-memory session store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    states: DashMap<i64, SessionState>,
    active_users: DashSet<i64>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: i64) -> Result<Option<SessionState>, DomainError> {
        Ok(self.states.get(&session_id).map(|entry| *entry.value()))
    }

    async fn set(&self, session_id: i64, state: SessionState) -> Result<(), DomainError> {
        self.states.insert(session_id, state);
        Ok(())
    }

    async fn delete(&self, session_id: i64) -> Result<(), DomainError> {
        self.states.remove(&session_id);
        Ok(())
    }

    async fn add_active_user(&self, user_id: i64) -> Result<(), DomainError> {
        self.active_users.insert(user_id);
        Ok(())
    }

    async fn remove_active_user(&self, user_id: i64) -> Result<(), DomainError> {
        self.active_users.remove(&user_id);
        Ok(())
    }

    async fn active_user_count(&self) -> Result<u64, DomainError> {
        Ok(self.active_users.len() as u64)
    }
}

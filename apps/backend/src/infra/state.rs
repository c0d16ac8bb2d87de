//! Application state builder.
//!
//! Collaborator handles (record store, session state store, judgment oracle)
//! are constructed once here and passed into the orchestrator, never
//! referenced as ambient globals. Tests inject in-memory implementations via
//! the `with_*` hooks.

use std::sync::Arc;

use crate::config::db::{DbOwner, DbProfile};
use crate::config::game::GameConfig;
use crate::config::oracle::OracleConfig;
use crate::config::redis::redis_url;
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::repos::store::{PgRecordStore, RecordStore};
use crate::services::game_flow::GameFlowService;
use crate::services::oracle::{AnthropicOracle, JudgeOracle};
use crate::services::session_state::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::app_state::AppState;

/// Which backend holds the ephemeral session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionBackend {
    #[default]
    Redis,
    /// Process-local store; fine for tests and single-process deployments.
    Memory,
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    session_backend: SessionBackend,
    records: Option<Arc<dyn RecordStore>>,
    sessions: Option<Arc<dyn SessionStore>>,
    oracle: Option<Arc<dyn JudgeOracle>>,
    game_config: Option<GameConfig>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_profile: None,
            session_backend: SessionBackend::default(),
            records: None,
            sessions: None,
            oracle: None,
            game_config: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_session_backend(mut self, backend: SessionBackend) -> Self {
        self.session_backend = backend;
        self
    }

    /// Inject a record store directly (tests).
    pub fn with_records(mut self, records: Arc<dyn RecordStore>) -> Self {
        self.records = Some(records);
        self
    }

    /// Inject a session store directly (tests).
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Inject an oracle directly (tests).
    pub fn with_oracle(mut self, oracle: Arc<dyn JudgeOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_game_config(mut self, config: GameConfig) -> Self {
        self.game_config = Some(config);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let records: Arc<dyn RecordStore> = match self.records {
            Some(records) => records,
            None => {
                let profile = self.db_profile.ok_or_else(|| {
                    AppError::config("no record store configured: set a DB profile or inject one")
                })?;
                let conn = connect_db(profile, DbOwner::App).await?;
                Arc::new(PgRecordStore::new(conn))
            }
        };

        let sessions: Arc<dyn SessionStore> = match self.sessions {
            Some(sessions) => sessions,
            None => match self.session_backend {
                SessionBackend::Redis => {
                    let store = RedisSessionStore::connect(&redis_url()?).await?;
                    Arc::new(store)
                }
                SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
            },
        };

        let oracle: Arc<dyn JudgeOracle> = match self.oracle {
            Some(oracle) => oracle,
            None => Arc::new(AnthropicOracle::new(OracleConfig::from_env()?)?),
        };

        let game_config = self.game_config.unwrap_or_else(GameConfig::from_env);

        let flow = GameFlowService::new(records, sessions, oracle, game_config);
        Ok(AppState::new(flow))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

//! Game session repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::sessions_sea as sessions_adapter;
use crate::entities::game_sessions;
use crate::errors::DomainError;

use super::map_db_err;

/// Game session domain model: one full game between a user and an AI
/// personality. `end_time` is set exactly once, when the session terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: i64,
    pub user_id: i64,
    pub ai_personality_id: i64,
    pub start_time: time::OffsetDateTime,
    pub end_time: Option<time::OffsetDateTime>,
}

impl GameSession {
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<GameSession>, DomainError> {
    let session = sessions_adapter::find_by_id(conn, session_id)
        .await
        .map_err(map_db_err)?;
    Ok(session.map(GameSession::from))
}

pub async fn find_all_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<GameSession>, DomainError> {
    let sessions = sessions_adapter::find_all_by_user(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(sessions.into_iter().map(GameSession::from).collect())
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    ai_personality_id: i64,
) -> Result<GameSession, DomainError> {
    let session = sessions_adapter::create_session(conn, user_id, ai_personality_id)
        .await
        .map_err(map_db_err)?;
    Ok(GameSession::from(session))
}

pub async fn end_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<GameSession, DomainError> {
    let session = sessions_adapter::set_end_time(conn, session_id)
        .await
        .map_err(map_db_err)?;
    Ok(GameSession::from(session))
}

impl From<game_sessions::Model> for GameSession {
    fn from(model: game_sessions::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            ai_personality_id: model.ai_personality_id,
            start_time: model.start_time,
            end_time: model.end_time,
        }
    }
}

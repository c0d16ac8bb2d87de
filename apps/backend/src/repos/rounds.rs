//! Game round repository functions for the domain layer.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use crate::adapters::rounds_sea as rounds_adapter;
use crate::entities::game_rounds;
use crate::errors::DomainError;

use super::map_db_err;

/// Winner of a resolved round (domain type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundWinner {
    Human,
    Ai,
    Tie,
}

/// Game round domain model. `winner == None` means the round is unresolved;
/// scores are cumulative as of the end of this round.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRound {
    pub id: i64,
    pub session_id: i64,
    pub round_number: u8,
    pub prompt_card_id: i64,
    pub user_score: i32,
    pub ai_score: i32,
    pub winner: Option<RoundWinner>,
    pub judge_explanation: Option<String>,
}

impl GameRound {
    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<GameRound>, DomainError> {
    let round = rounds_adapter::find_by_id(conn, round_id)
        .await
        .map_err(map_db_err)?;
    Ok(round.map(GameRound::from))
}

pub async fn find_latest_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<GameRound>, DomainError> {
    let round = rounds_adapter::find_latest_by_session(conn, session_id)
        .await
        .map_err(map_db_err)?;
    Ok(round.map(GameRound::from))
}

pub async fn find_all_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<GameRound>, DomainError> {
    let rounds = rounds_adapter::find_all_by_session(conn, session_id)
        .await
        .map_err(map_db_err)?;
    Ok(rounds.into_iter().map(GameRound::from).collect())
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_number: u8,
    prompt_card_id: i64,
    user_score: i32,
    ai_score: i32,
) -> Result<GameRound, DomainError> {
    let dto = rounds_adapter::RoundCreate {
        session_id,
        round_number: round_number as i16,
        prompt_card_id,
        user_score,
        ai_score,
    };
    let round = rounds_adapter::create_round(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(GameRound::from(round))
}

pub async fn resolve_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    winner: RoundWinner,
    judge_explanation: &str,
    user_score: i32,
    ai_score: i32,
) -> Result<GameRound, DomainError> {
    let dto = rounds_adapter::RoundResolve {
        round_id,
        winner: winner.into(),
        judge_explanation: judge_explanation.to_string(),
        user_score,
        ai_score,
    };
    let round = rounds_adapter::resolve_round(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(GameRound::from(round))
}

// Conversions between SeaORM models and domain models

impl From<game_rounds::Model> for GameRound {
    fn from(model: game_rounds::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            round_number: model.round_number.clamp(0, u8::MAX as i16) as u8,
            prompt_card_id: model.prompt_card_id,
            user_score: model.user_score,
            ai_score: model.ai_score,
            winner: model.winner.map(RoundWinner::from),
            judge_explanation: model.judge_explanation,
        }
    }
}

impl From<game_rounds::RoundWinner> for RoundWinner {
    fn from(w: game_rounds::RoundWinner) -> Self {
        match w {
            game_rounds::RoundWinner::Human => RoundWinner::Human,
            game_rounds::RoundWinner::Ai => RoundWinner::Ai,
            game_rounds::RoundWinner::Tie => RoundWinner::Tie,
        }
    }
}

impl From<RoundWinner> for game_rounds::RoundWinner {
    fn from(w: RoundWinner) -> Self {
        match w {
            RoundWinner::Human => game_rounds::RoundWinner::Human,
            RoundWinner::Ai => game_rounds::RoundWinner::Ai,
            RoundWinner::Tie => game_rounds::RoundWinner::Tie,
        }
    }
}

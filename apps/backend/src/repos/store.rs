//! Record storage port.
//!
//! The core state machine only needs simple create/read/update calls keyed by
//! id, so it talks to storage through this trait. `PgRecordStore` is the
//! production implementation over SeaORM; tests supply an in-memory one.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::adapters::{plays_sea, rounds_sea};
use crate::errors::DomainError;
use crate::repos::cards::{CardFilter, PromptCard, ResponseCard};
use crate::repos::personalities::AiPersonality;
use crate::repos::plays::CardPlay;
use crate::repos::rounds::{GameRound, RoundWinner};
use crate::repos::sessions::GameSession;
use crate::repos::users::User;
use crate::repos::{cards, map_db_err, personalities, plays, rounds, sessions, users};

/// Fields for a new, unresolved round.
#[derive(Debug, Clone)]
pub struct NewRound {
    pub session_id: i64,
    pub round_number: u8,
    pub prompt_card_id: i64,
    pub user_score: i32,
    pub ai_score: i32,
}

/// The one-time mutation a round receives at resolution.
#[derive(Debug, Clone)]
pub struct RoundResolution {
    pub winner: RoundWinner,
    pub explanation: String,
    pub user_score: i32,
    pub ai_score: i32,
}

/// One paired (user card, ai card) slot; pairing order becomes play_order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayPair {
    pub user_card_id: i64,
    pub ai_card_id: i64,
}

/// Storage collaborator interface for the orchestrator and resolver.
///
/// Every call either succeeds or fails with `DomainError::Storage`; failures
/// are fatal to the current operation and never retried internally.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // users
    async fn user(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn create_user(&self, username: &str) -> Result<User, DomainError>;

    // AI personalities
    async fn personality(&self, id: i64) -> Result<Option<AiPersonality>, DomainError>;
    async fn personality_by_name(&self, name: &str)
        -> Result<Option<AiPersonality>, DomainError>;
    async fn personalities(&self) -> Result<Vec<AiPersonality>, DomainError>;
    async fn create_personality(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Option<i64>,
    ) -> Result<AiPersonality, DomainError>;

    // cards (read-only reference data)
    async fn prompt_card(&self, id: i64) -> Result<Option<PromptCard>, DomainError>;
    async fn prompt_pool(&self, filter: &CardFilter) -> Result<Vec<PromptCard>, DomainError>;
    async fn response_pool(&self, filter: &CardFilter)
        -> Result<Vec<ResponseCard>, DomainError>;
    async fn response_cards(&self, ids: &[i64]) -> Result<Vec<ResponseCard>, DomainError>;

    // sessions
    async fn create_session(
        &self,
        user_id: i64,
        personality_id: i64,
    ) -> Result<GameSession, DomainError>;
    async fn session(&self, id: i64) -> Result<Option<GameSession>, DomainError>;
    async fn sessions_for_user(&self, user_id: i64) -> Result<Vec<GameSession>, DomainError>;
    async fn end_session(&self, id: i64) -> Result<GameSession, DomainError>;

    // rounds and plays
    async fn create_round(&self, round: NewRound) -> Result<GameRound, DomainError>;
    async fn round(&self, id: i64) -> Result<Option<GameRound>, DomainError>;
    async fn latest_round(&self, session_id: i64) -> Result<Option<GameRound>, DomainError>;
    async fn rounds_for_session(&self, session_id: i64) -> Result<Vec<GameRound>, DomainError>;
    /// Persist a round's resolution and its paired plays atomically.
    async fn record_resolution(
        &self,
        round_id: i64,
        resolution: RoundResolution,
        plays: Vec<PlayPair>,
    ) -> Result<GameRound, DomainError>;
    async fn plays_for_round(&self, round_id: i64) -> Result<Vec<CardPlay>, DomainError>;
}

/// Production record store over a SeaORM Postgres connection.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    db: DatabaseConnection,
}

impl PgRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn user(&self, id: i64) -> Result<Option<User>, DomainError> {
        users::find_by_id(&self.db, id).await
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        users::find_by_username(&self.db, username).await
    }

    async fn create_user(&self, username: &str) -> Result<User, DomainError> {
        users::create_user(&self.db, username).await
    }

    async fn personality(&self, id: i64) -> Result<Option<AiPersonality>, DomainError> {
        personalities::find_by_id(&self.db, id).await
    }

    async fn personality_by_name(
        &self,
        name: &str,
    ) -> Result<Option<AiPersonality>, DomainError> {
        personalities::find_by_name(&self.db, name).await
    }

    async fn personalities(&self) -> Result<Vec<AiPersonality>, DomainError> {
        personalities::find_all(&self.db).await
    }

    async fn create_personality(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Option<i64>,
    ) -> Result<AiPersonality, DomainError> {
        personalities::create_personality(&self.db, name, description, created_by).await
    }

    async fn prompt_card(&self, id: i64) -> Result<Option<PromptCard>, DomainError> {
        cards::find_prompt_by_id(&self.db, id).await
    }

    async fn prompt_pool(&self, filter: &CardFilter) -> Result<Vec<PromptCard>, DomainError> {
        cards::prompt_pool(&self.db, filter).await
    }

    async fn response_pool(
        &self,
        filter: &CardFilter,
    ) -> Result<Vec<ResponseCard>, DomainError> {
        cards::response_pool(&self.db, filter).await
    }

    async fn response_cards(&self, ids: &[i64]) -> Result<Vec<ResponseCard>, DomainError> {
        cards::find_responses_by_ids(&self.db, ids).await
    }

    async fn create_session(
        &self,
        user_id: i64,
        personality_id: i64,
    ) -> Result<GameSession, DomainError> {
        sessions::create_session(&self.db, user_id, personality_id).await
    }

    async fn session(&self, id: i64) -> Result<Option<GameSession>, DomainError> {
        sessions::find_by_id(&self.db, id).await
    }

    async fn sessions_for_user(&self, user_id: i64) -> Result<Vec<GameSession>, DomainError> {
        sessions::find_all_by_user(&self.db, user_id).await
    }

    async fn end_session(&self, id: i64) -> Result<GameSession, DomainError> {
        sessions::end_session(&self.db, id).await
    }

    async fn create_round(&self, round: NewRound) -> Result<GameRound, DomainError> {
        rounds::create_round(
            &self.db,
            round.session_id,
            round.round_number,
            round.prompt_card_id,
            round.user_score,
            round.ai_score,
        )
        .await
    }

    async fn round(&self, id: i64) -> Result<Option<GameRound>, DomainError> {
        rounds::find_by_id(&self.db, id).await
    }

    async fn latest_round(&self, session_id: i64) -> Result<Option<GameRound>, DomainError> {
        rounds::find_latest_by_session(&self.db, session_id).await
    }

    async fn rounds_for_session(&self, session_id: i64) -> Result<Vec<GameRound>, DomainError> {
        rounds::find_all_by_session(&self.db, session_id).await
    }

    async fn record_resolution(
        &self,
        round_id: i64,
        resolution: RoundResolution,
        play_pairs: Vec<PlayPair>,
    ) -> Result<GameRound, DomainError> {
        // Round mutation and play inserts commit together or not at all.
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let dto = rounds_sea::RoundResolve {
            round_id,
            winner: resolution.winner.into(),
            judge_explanation: resolution.explanation,
            user_score: resolution.user_score,
            ai_score: resolution.ai_score,
        };
        let result = async {
            let round = rounds_sea::resolve_round(&txn, dto).await?;

            let play_rows = play_pairs
                .iter()
                .enumerate()
                .map(|(i, pair)| plays_sea::PlayCreate {
                    round_id,
                    user_card_id: pair.user_card_id,
                    ai_card_id: pair.ai_card_id,
                    play_order: i as i16,
                })
                .collect();
            plays_sea::insert_plays(&txn, play_rows).await?;

            Ok::<_, sea_orm::DbErr>(round)
        }
        .await;

        match result {
            Ok(round) => {
                txn.commit().await.map_err(map_db_err)?;
                Ok(GameRound::from(round))
            }
            Err(err) => {
                // Best-effort rollback; preserve original error
                let _ = txn.rollback().await;
                Err(map_db_err(err))
            }
        }
    }

    async fn plays_for_round(&self, round_id: i64) -> Result<Vec<CardPlay>, DomainError> {
        plays::find_all_by_round(&self.db, round_id).await
    }
}

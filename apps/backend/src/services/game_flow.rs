//! Game flow orchestration: the session state machine.
//!
//! Coordinates session creation -> start -> per-round dealing -> submission
//! -> resolution -> next-round-or-end, and owns consistency between durable
//! records and the ephemeral session state store. Durable state is written
//! first and is authoritative; ephemeral state is advisory and is rebuilt
//! from the latest round whenever the cache misses.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::game::GameConfig;
use crate::errors::domain::{ConflictKind, NotFoundKind, OracleKind, ValidationKind};
use crate::errors::DomainError;
use crate::infra::session_locks::SessionLocks;
use crate::repos::cards::{CardFilter, PromptCard, ResponseCard};
use crate::repos::personalities::AiPersonality;
use crate::repos::plays::CardPlay;
use crate::repos::rounds::GameRound;
use crate::repos::sessions::GameSession;
use crate::repos::store::{NewRound, RecordStore};
use crate::repos::users::User;
use crate::services::card_drawer;
use crate::services::oracle::JudgeOracle;
use crate::services::round_resolver::RoundResolver;
use crate::services::session_state::{SessionState, SessionStatus, SessionStore};

/// A freshly dealt view of the current round: the prompt and a fresh hand of
/// response cards (hands do not persist across rounds).
#[derive(Debug, Clone)]
pub struct Deal {
    pub round: GameRound,
    pub prompt: PromptCard,
    pub hand: Vec<ResponseCard>,
}

/// A round together with its persisted play records.
#[derive(Debug, Clone)]
pub struct RoundResult {
    pub round: GameRound,
    pub plays: Vec<CardPlay>,
}

/// Durable session plus its (possibly rebuilt) ephemeral state.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub session: GameSession,
    pub state: SessionState,
}

/// Capacity admission snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityStatus {
    pub active_users: u64,
    pub available_slots: u64,
    pub max_users: u64,
}

/// Game orchestrator. Collaborators are injected once at process start.
#[derive(Clone)]
pub struct GameFlowService {
    records: Arc<dyn RecordStore>,
    sessions: Arc<dyn SessionStore>,
    oracle: Arc<dyn JudgeOracle>,
    resolver: Arc<RoundResolver>,
    locks: Arc<SessionLocks>,
    config: GameConfig,
}

impl GameFlowService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        sessions: Arc<dyn SessionStore>,
        oracle: Arc<dyn JudgeOracle>,
        config: GameConfig,
    ) -> Self {
        let resolver = Arc::new(RoundResolver::new(
            records.clone(),
            oracle.clone(),
            config.judge_timeout,
        ));
        Self {
            records,
            sessions,
            oracle,
            resolver,
            locks: Arc::new(SessionLocks::new()),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ---- users and capacity ----

    /// Get-or-create a user by display name.
    pub async fn ensure_user(&self, username: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::MalformedInput,
                "username must not be empty",
            ));
        }

        if let Some(user) = self.records.user_by_username(username).await? {
            return Ok(user);
        }

        let user = self.records.create_user(username).await?;
        info!(user_id = user.id, username, "created user");
        Ok(user)
    }

    /// Admit a user: capacity check first, then get-or-create, then mark
    /// active. Rejected admissions never touch durable storage.
    pub async fn connect_user(&self, username: &str) -> Result<User, DomainError> {
        self.check_capacity().await?;
        let user = self.ensure_user(username).await?;
        self.sessions.add_active_user(user.id).await?;
        Ok(user)
    }

    pub async fn disconnect_user(&self, user_id: i64) -> Result<(), DomainError> {
        self.require_user(user_id).await?;
        self.sessions.remove_active_user(user_id).await?;
        Ok(())
    }

    pub async fn capacity_status(&self) -> Result<CapacityStatus, DomainError> {
        let active_users = self.sessions.active_user_count().await?;
        let max_users = self.config.max_active_users;
        Ok(CapacityStatus {
            active_users,
            available_slots: max_users.saturating_sub(active_users),
            max_users,
        })
    }

    async fn check_capacity(&self) -> Result<(), DomainError> {
        let active = self.sessions.active_user_count().await?;
        if active >= self.config.max_active_users {
            return Err(DomainError::conflict(
                ConflictKind::AtCapacity,
                format!("server at capacity ({active} active users)"),
            ));
        }
        Ok(())
    }

    // ---- personalities ----

    pub async fn create_personality(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Option<i64>,
    ) -> Result<AiPersonality, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::MalformedInput,
                "personality name must not be empty",
            ));
        }
        if let Some(user_id) = created_by {
            self.require_user(user_id).await?;
        }
        if self.records.personality_by_name(name).await?.is_some() {
            return Err(DomainError::validation(
                ValidationKind::MalformedInput,
                format!("personality '{name}' already exists"),
            ));
        }

        let personality = self
            .records
            .create_personality(name, description, created_by)
            .await?;
        info!(personality_id = personality.id, name, "created AI personality");
        Ok(personality)
    }

    pub async fn list_personalities(&self) -> Result<Vec<AiPersonality>, DomainError> {
        self.records.personalities().await
    }

    // ---- session lifecycle ----

    /// Create a session. Capacity admission happens before any durable write.
    pub async fn create_session(
        &self,
        user_id: i64,
        personality_id: i64,
    ) -> Result<GameSession, DomainError> {
        self.check_capacity().await?;
        self.require_user(user_id).await?;
        self.require_personality(personality_id).await?;

        let session = self.records.create_session(user_id, personality_id).await?;
        self.mirror_state(session.id, SessionState::created()).await;

        info!(
            session_id = session.id,
            user_id, personality_id, "created game session"
        );
        Ok(session)
    }

    pub async fn get_session(&self, session_id: i64) -> Result<SessionView, DomainError> {
        let session = self.require_session(session_id).await?;
        let state = self.session_state(&session).await?;
        Ok(SessionView { session, state })
    }

    /// List a user's sessions (game history).
    pub async fn session_history(&self, user_id: i64) -> Result<Vec<GameSession>, DomainError> {
        self.require_user(user_id).await?;
        self.records.sessions_for_user(user_id).await
    }

    /// Start a session: draw a prompt card and create round 1. The durable
    /// round is written before the ephemeral status flip.
    pub async fn start_session(
        &self,
        session_id: i64,
        filter: &CardFilter,
    ) -> Result<GameRound, DomainError> {
        let lock = self.locks.lock_for(session_id);
        let _guard = lock.lock().await;

        let session = self.require_session(session_id).await?;
        let state = self.session_state(&session).await?;
        if state.status != SessionStatus::Created {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyStarted,
                format!("session {session_id} was already started"),
            ));
        }

        let prompt = self.draw_prompt(filter).await?;
        let round = self
            .records
            .create_round(NewRound {
                session_id,
                round_number: 1,
                prompt_card_id: prompt.id,
                user_score: 0,
                ai_score: 0,
            })
            .await?;

        self.mirror_state(session_id, SessionState::in_progress(1, 0, 0))
            .await;

        info!(session_id, round_id = round.id, "session started");
        Ok(round)
    }

    /// Current-round view plus a fresh hand (fresh draw every round).
    pub async fn deal(&self, session_id: i64, filter: &CardFilter) -> Result<Deal, DomainError> {
        let session = self.require_session(session_id).await?;
        let state = self.session_state(&session).await?;
        match state.status {
            SessionStatus::Created => {
                return Err(DomainError::conflict(
                    ConflictKind::NotStarted,
                    format!("session {session_id} has not been started"),
                ));
            }
            SessionStatus::Completed => {
                return Err(DomainError::conflict(
                    ConflictKind::SessionCompleted,
                    format!("session {session_id} is completed"),
                ));
            }
            SessionStatus::InProgress => {}
        }

        let round = self
            .records
            .latest_round(session_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Round,
                    format!("session {session_id} has no rounds"),
                )
            })?;
        if round.is_resolved() {
            return Err(DomainError::conflict(
                ConflictKind::RoundAlreadyResolved,
                format!(
                    "round {} is already resolved; advance the session for a new round",
                    round.id
                ),
            ));
        }

        let prompt = self.require_prompt_card(round.prompt_card_id).await?;

        let pool = self.records.response_pool(filter).await?;
        let hand = {
            let mut rng = rand::rng();
            card_drawer::draw_response_cards(&mut rng, &pool, self.config.hand_size)?
        };

        Ok(Deal {
            round,
            prompt,
            hand,
        })
    }

    /// Ask the oracle to play the AI side of a round from candidate cards.
    pub async fn ai_play(
        &self,
        round_id: i64,
        candidate_card_ids: &[i64],
    ) -> Result<Vec<ResponseCard>, DomainError> {
        let round = self.require_round(round_id).await?;
        if round.is_resolved() {
            return Err(DomainError::conflict(
                ConflictKind::RoundAlreadyResolved,
                format!("round {round_id} is already resolved"),
            ));
        }

        let session = self.require_session(round.session_id).await?;
        let personality = self.require_personality(session.ai_personality_id).await?;
        let prompt = self.require_prompt_card(round.prompt_card_id).await?;

        let candidates = self.load_response_cards(candidate_card_ids).await?;

        let selection = match timeout(
            self.config.judge_timeout,
            self.oracle
                .choose_cards(&prompt, &candidates, &personality, prompt.pick),
        )
        .await
        {
            Err(_) => {
                return Err(DomainError::oracle(
                    OracleKind::Unavailable,
                    format!("round {round_id}: oracle timed out choosing cards"),
                ));
            }
            Ok(result) => result?,
        };

        // Selection is validated by the client; map ids back to cards in
        // selection order.
        let chosen = selection
            .iter()
            .filter_map(|id| candidates.iter().find(|c| c.id == *id).cloned())
            .collect();
        Ok(chosen)
    }

    /// Submit a round's paired card sets for resolution. Retryable on oracle
    /// failure; the round stays unresolved until a resolution commits.
    pub async fn submit_round(
        &self,
        round_id: i64,
        user_card_ids: &[i64],
        ai_card_ids: &[i64],
    ) -> Result<GameRound, DomainError> {
        let round = self.require_round(round_id).await?;

        let lock = self.locks.lock_for(round.session_id);
        let _guard = lock.lock().await;

        let resolved = self
            .resolver
            .resolve(round_id, user_card_ids, ai_card_ids)
            .await?;

        self.mirror_state(
            resolved.session_id,
            SessionState::in_progress(
                resolved.round_number,
                resolved.user_score,
                resolved.ai_score,
            ),
        )
        .await;

        Ok(resolved)
    }

    pub async fn get_round_result(&self, round_id: i64) -> Result<RoundResult, DomainError> {
        let round = self.require_round(round_id).await?;
        let plays = self.records.plays_for_round(round_id).await?;
        Ok(RoundResult { round, plays })
    }

    /// Create the next round, or complete the session after the final round.
    /// Returns `None` when the session just completed.
    pub async fn advance_round(
        &self,
        session_id: i64,
        filter: &CardFilter,
    ) -> Result<Option<GameRound>, DomainError> {
        let lock = self.locks.lock_for(session_id);
        let _guard = lock.lock().await;

        let session = self.require_session(session_id).await?;
        if session.is_completed() {
            return Err(DomainError::conflict(
                ConflictKind::SessionCompleted,
                format!("session {session_id} is already completed"),
            ));
        }

        let latest = self
            .records
            .latest_round(session_id)
            .await?
            .ok_or_else(|| {
                DomainError::conflict(
                    ConflictKind::NotStarted,
                    format!("session {session_id} has no rounds; start it first"),
                )
            })?;

        if !latest.is_resolved() {
            return Err(DomainError::conflict(
                ConflictKind::RoundUnresolved,
                format!(
                    "round {} is unresolved; submit it before advancing",
                    latest.id
                ),
            ));
        }

        if latest.round_number >= self.config.max_rounds {
            // Final round played: freeze scores and terminate.
            self.records.end_session(session_id).await?;
            self.mirror_state(
                session_id,
                SessionState::completed(
                    latest.round_number,
                    latest.user_score,
                    latest.ai_score,
                ),
            )
            .await;

            info!(
                session_id,
                rounds = latest.round_number,
                user_score = latest.user_score,
                ai_score = latest.ai_score,
                "session completed"
            );
            return Ok(None);
        }

        let prompt = self.draw_prompt(filter).await?;
        let next_number = latest.round_number + 1;
        let round = self
            .records
            .create_round(NewRound {
                session_id,
                round_number: next_number,
                prompt_card_id: prompt.id,
                user_score: latest.user_score,
                ai_score: latest.ai_score,
            })
            .await?;

        self.mirror_state(
            session_id,
            SessionState::in_progress(next_number, latest.user_score, latest.ai_score),
        )
        .await;

        info!(session_id, round_id = round.id, round_number = next_number, "advanced to next round");
        Ok(Some(round))
    }

    // ---- internals ----

    async fn draw_prompt(&self, filter: &CardFilter) -> Result<PromptCard, DomainError> {
        let pool = self.records.prompt_pool(filter).await?;
        let mut rng = rand::rng();
        card_drawer::draw_prompt_card(&mut rng, &pool)
    }

    /// Read ephemeral state, rebuilding it from the latest durable round on a
    /// cache miss (the store may lose data on restart by design).
    async fn session_state(&self, session: &GameSession) -> Result<SessionState, DomainError> {
        match self.sessions.get(session.id).await {
            Ok(Some(state)) => return Ok(state),
            Ok(None) => {}
            Err(err) => {
                warn!(session_id = session.id, error = %err, "session state read failed; rebuilding from durable state");
            }
        }

        let state = match self.records.latest_round(session.id).await? {
            None => SessionState::created(),
            Some(round) if session.is_completed() => {
                SessionState::completed(round.round_number, round.user_score, round.ai_score)
            }
            Some(round) => {
                SessionState::in_progress(round.round_number, round.user_score, round.ai_score)
            }
        };

        self.mirror_state(session.id, state).await;
        Ok(state)
    }

    /// Ephemeral writes happen after durable writes and are advisory: a
    /// failure leaves stale cache state, logged but not fatal.
    async fn mirror_state(&self, session_id: i64, state: SessionState) {
        if let Err(err) = self.sessions.set(session_id, state).await {
            warn!(
                session_id,
                error = %err,
                "failed to write ephemeral session state; durable state remains authoritative"
            );
        }
    }

    async fn load_response_cards(&self, ids: &[i64]) -> Result<Vec<ResponseCard>, DomainError> {
        let fetched = self.records.response_cards(ids).await?;
        ids.iter()
            .map(|id| {
                fetched
                    .iter()
                    .find(|c| c.id == *id)
                    .cloned()
                    .ok_or_else(|| {
                        DomainError::not_found(
                            NotFoundKind::Card,
                            format!("response card {id} not found"),
                        )
                    })
            })
            .collect()
    }

    async fn require_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.records.user(user_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::User, format!("user {user_id} not found"))
        })
    }

    async fn require_personality(
        &self,
        personality_id: i64,
    ) -> Result<AiPersonality, DomainError> {
        self.records
            .personality(personality_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Personality,
                    format!("AI personality {personality_id} not found"),
                )
            })
    }

    async fn require_session(&self, session_id: i64) -> Result<GameSession, DomainError> {
        self.records.session(session_id).await?.ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Session,
                format!("session {session_id} not found"),
            )
        })
    }

    async fn require_round(&self, round_id: i64) -> Result<GameRound, DomainError> {
        self.records.round(round_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Round, format!("round {round_id} not found"))
        })
    }

    async fn require_prompt_card(&self, card_id: i64) -> Result<PromptCard, DomainError> {
        self.records.prompt_card(card_id).await?.ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Card,
                format!("prompt card {card_id} not found"),
            )
        })
    }
}

//! In-memory `RecordStore` used by the integration suites.

use std::sync::Mutex;

use async_trait::async_trait;
use backend::errors::DomainError;
use backend::repos::cards::{CardFilter, PromptCard, ResponseCard};
use backend::repos::personalities::AiPersonality;
use backend::repos::plays::CardPlay;
use backend::repos::rounds::GameRound;
use backend::repos::sessions::GameSession;
use backend::repos::store::{NewRound, PlayPair, RecordStore, RoundResolution};
use backend::repos::users::User;

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
    personalities: Vec<AiPersonality>,
    prompt_cards: Vec<PromptCard>,
    response_cards: Vec<ResponseCard>,
    sessions: Vec<GameSession>,
    rounds: Vec<GameRound>,
    plays: Vec<CardPlay>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Hermetic record store backing the orchestrator/resolver tests.
#[derive(Default)]
pub struct MemoryRecords {
    inner: Mutex<Inner>,
}

fn matches_filter(watermark: &Option<String>, category: &Option<String>, filter: &CardFilter) -> bool {
    if let Some(wanted) = &filter.watermark {
        if watermark.as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }
    if let Some(wanted) = &filter.category {
        if category.as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }
    true
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- fixtures ----

    pub fn seed_user(&self, username: &str) -> User {
        let mut inner = self.inner.lock().unwrap();
        let user = User {
            id: inner.next_id(),
            username: username.to_string(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        user
    }

    pub fn seed_personality(&self, name: &str, description: &str) -> AiPersonality {
        let mut inner = self.inner.lock().unwrap();
        let personality = AiPersonality {
            id: inner.next_id(),
            name: name.to_string(),
            description: Some(description.to_string()),
            created_by: None,
            created_at: time::OffsetDateTime::now_utc(),
        };
        inner.personalities.push(personality.clone());
        personality
    }

    pub fn seed_prompt(&self, text: &str, pick: u8) -> PromptCard {
        let mut inner = self.inner.lock().unwrap();
        let card = PromptCard {
            id: inner.next_id(),
            text: text.to_string(),
            pick,
            watermark: None,
            category: None,
        };
        inner.prompt_cards.push(card.clone());
        card
    }

    pub fn seed_responses(&self, count: usize) -> Vec<ResponseCard> {
        let mut inner = self.inner.lock().unwrap();
        (0..count)
            .map(|i| {
                let card = ResponseCard {
                    id: inner.next_id(),
                    text: format!("response card {i}"),
                    watermark: None,
                    category: None,
                };
                inner.response_cards.push(card.clone());
                card
            })
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }

    pub fn play_count(&self) -> usize {
        self.inner.lock().unwrap().plays.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn user(&self, id: i64) -> Result<Option<User>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, username: &str) -> Result<User, DomainError> {
        Ok(self.seed_user(username))
    }

    async fn personality(&self, id: i64) -> Result<Option<AiPersonality>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.personalities.iter().find(|p| p.id == id).cloned())
    }

    async fn personality_by_name(
        &self,
        name: &str,
    ) -> Result<Option<AiPersonality>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.personalities.iter().find(|p| p.name == name).cloned())
    }

    async fn personalities(&self) -> Result<Vec<AiPersonality>, DomainError> {
        Ok(self.inner.lock().unwrap().personalities.clone())
    }

    async fn create_personality(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Option<i64>,
    ) -> Result<AiPersonality, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let personality = AiPersonality {
            id: inner.next_id(),
            name: name.to_string(),
            description: description.map(|d| d.to_string()),
            created_by,
            created_at: time::OffsetDateTime::now_utc(),
        };
        inner.personalities.push(personality.clone());
        Ok(personality)
    }

    async fn prompt_card(&self, id: i64) -> Result<Option<PromptCard>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.prompt_cards.iter().find(|c| c.id == id).cloned())
    }

    async fn prompt_pool(&self, filter: &CardFilter) -> Result<Vec<PromptCard>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .prompt_cards
            .iter()
            .filter(|c| matches_filter(&c.watermark, &c.category, filter))
            .cloned()
            .collect())
    }

    async fn response_pool(
        &self,
        filter: &CardFilter,
    ) -> Result<Vec<ResponseCard>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .response_cards
            .iter()
            .filter(|c| matches_filter(&c.watermark, &c.category, filter))
            .cloned()
            .collect())
    }

    async fn response_cards(&self, ids: &[i64]) -> Result<Vec<ResponseCard>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .response_cards
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn create_session(
        &self,
        user_id: i64,
        personality_id: i64,
    ) -> Result<GameSession, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let session = GameSession {
            id: inner.next_id(),
            user_id,
            ai_personality_id: personality_id,
            start_time: time::OffsetDateTime::now_utc(),
            end_time: None,
        };
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn session(&self, id: i64) -> Result<Option<GameSession>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn sessions_for_user(&self, user_id: i64) -> Result<Vec<GameSession>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn end_session(&self, id: i64) -> Result<GameSession, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::storage(format!("session {id} missing")))?;
        session.end_time = Some(time::OffsetDateTime::now_utc());
        Ok(session.clone())
    }

    async fn create_round(&self, round: NewRound) -> Result<GameRound, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let round = GameRound {
            id: inner.next_id(),
            session_id: round.session_id,
            round_number: round.round_number,
            prompt_card_id: round.prompt_card_id,
            user_score: round.user_score,
            ai_score: round.ai_score,
            winner: None,
            judge_explanation: None,
        };
        inner.rounds.push(round.clone());
        Ok(round)
    }

    async fn round(&self, id: i64) -> Result<Option<GameRound>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rounds.iter().find(|r| r.id == id).cloned())
    }

    async fn latest_round(&self, session_id: i64) -> Result<Option<GameRound>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rounds
            .iter()
            .filter(|r| r.session_id == session_id)
            .max_by_key(|r| r.round_number)
            .cloned())
    }

    async fn rounds_for_session(&self, session_id: i64) -> Result<Vec<GameRound>, DomainError> {
        let inner = self.inner.lock().unwrap();
        let mut rounds: Vec<GameRound> = inner
            .rounds
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }

    async fn record_resolution(
        &self,
        round_id: i64,
        resolution: RoundResolution,
        plays: Vec<PlayPair>,
    ) -> Result<GameRound, DomainError> {
        let mut inner = self.inner.lock().unwrap();

        let play_rows: Vec<CardPlay> = plays
            .iter()
            .enumerate()
            .map(|(i, pair)| CardPlay {
                id: 0,
                round_id,
                user_card_id: pair.user_card_id,
                ai_card_id: pair.ai_card_id,
                play_order: i as i16,
            })
            .collect();

        let round = inner
            .rounds
            .iter_mut()
            .find(|r| r.id == round_id)
            .ok_or_else(|| DomainError::storage(format!("round {round_id} missing")))?;
        round.winner = Some(resolution.winner);
        round.judge_explanation = Some(resolution.explanation);
        round.user_score = resolution.user_score;
        round.ai_score = resolution.ai_score;
        let updated = round.clone();

        for mut play in play_rows {
            play.id = inner.next_id();
            inner.plays.push(play);
        }

        Ok(updated)
    }

    async fn plays_for_round(&self, round_id: i64) -> Result<Vec<CardPlay>, DomainError> {
        let inner = self.inner.lock().unwrap();
        let mut plays: Vec<CardPlay> = inner
            .plays
            .iter()
            .filter(|p| p.round_id == round_id)
            .cloned()
            .collect();
        plays.sort_by_key(|p| p.play_order);
        Ok(plays)
    }
}

//! Scripted judgment oracle: queued verdicts/selections, call counting, and
//! an optional artificial delay for timeout tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use backend::errors::domain::OracleKind;
use backend::errors::DomainError;
use backend::repos::cards::{PromptCard, ResponseCard};
use backend::repos::personalities::AiPersonality;
use backend::services::oracle::{JudgeOracle, JudgedWinner, Verdict};

#[derive(Default)]
pub struct ScriptedOracle {
    verdicts: Mutex<VecDeque<Result<Verdict, DomainError>>>,
    selections: Mutex<VecDeque<Result<Vec<i64>, DomainError>>>,
    default_verdict: Option<Verdict>,
    delay: Option<Duration>,
    judge_calls: AtomicUsize,
    choose_calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oracle that always declares the same winner once queues run dry.
    pub fn always(winner: JudgedWinner, explanation: &str) -> Self {
        Self {
            default_verdict: Some(Verdict {
                winner,
                explanation: explanation.to_string(),
            }),
            ..Self::default()
        }
    }

    /// Sleep this long inside every call (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_verdict(&self, winner: JudgedWinner, explanation: &str) {
        self.verdicts.lock().unwrap().push_back(Ok(Verdict {
            winner,
            explanation: explanation.to_string(),
        }));
    }

    pub fn push_judge_error(&self, err: DomainError) {
        self.verdicts.lock().unwrap().push_back(Err(err));
    }

    pub fn push_selection(&self, selection: Vec<i64>) {
        self.selections.lock().unwrap().push_back(Ok(selection));
    }

    pub fn push_selection_error(&self, err: DomainError) {
        self.selections.lock().unwrap().push_back(Err(err));
    }

    pub fn judge_calls(&self) -> usize {
        self.judge_calls.load(Ordering::SeqCst)
    }

    pub fn choose_calls(&self) -> usize {
        self.choose_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl JudgeOracle for ScriptedOracle {
    async fn judge(
        &self,
        _prompt: &PromptCard,
        _user_cards: &[ResponseCard],
        _ai_cards: &[ResponseCard],
        _personality: &AiPersonality,
    ) -> Result<Verdict, DomainError> {
        self.judge_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;

        if let Some(scripted) = self.verdicts.lock().unwrap().pop_front() {
            return scripted;
        }
        self.default_verdict.clone().ok_or_else(|| {
            DomainError::oracle(OracleKind::Unavailable, "no scripted verdict queued")
        })
    }

    async fn choose_cards(
        &self,
        _prompt: &PromptCard,
        candidates: &[ResponseCard],
        _personality: &AiPersonality,
        pick: u8,
    ) -> Result<Vec<i64>, DomainError> {
        self.choose_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;

        if let Some(scripted) = self.selections.lock().unwrap().pop_front() {
            return scripted;
        }
        // Unscripted default: play the first `pick` candidates.
        Ok(candidates.iter().take(pick as usize).map(|c| c.id).collect())
    }
}

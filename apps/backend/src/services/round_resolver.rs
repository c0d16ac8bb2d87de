//! Round resolution pipeline: `unresolved -> resolved`, exactly once.
//!
//! Given a round's paired submissions the resolver validates them, detects
//! ties, invokes the judgment oracle (skipped on tie, timeout-bound), applies
//! the score update, and persists the play records together with the round
//! mutation in one storage transaction. On oracle failure the round stays
//! unresolved and the submission may be retried.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::errors::domain::{ConflictKind, NotFoundKind, OracleKind, ValidationKind};
use crate::errors::DomainError;
use crate::repos::cards::{PromptCard, ResponseCard};
use crate::repos::rounds::{GameRound, RoundWinner};
use crate::repos::store::{PlayPair, RecordStore, RoundResolution};
use crate::services::oracle::{JudgeOracle, JudgedWinner, Verdict};

/// Fixed explanation for the identical-play short circuit: identical plays
/// cannot be meaningfully judged, so the oracle is never consulted.
pub const IDENTICAL_PLAY_EXPLANATION: &str =
    "The AI and human both played the same cards... so boring.";

pub struct RoundResolver {
    records: Arc<dyn RecordStore>,
    oracle: Arc<dyn JudgeOracle>,
    judge_timeout: Duration,
}

impl RoundResolver {
    pub fn new(
        records: Arc<dyn RecordStore>,
        oracle: Arc<dyn JudgeOracle>,
        judge_timeout: Duration,
    ) -> Self {
        Self {
            records,
            oracle,
            judge_timeout,
        }
    }

    /// Resolve a round from its paired submissions.
    pub async fn resolve(
        &self,
        round_id: i64,
        user_card_ids: &[i64],
        ai_card_ids: &[i64],
    ) -> Result<GameRound, DomainError> {
        let round = self
            .records
            .round(round_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Round, format!("round {round_id} not found"))
            })?;

        if round.is_resolved() {
            return Err(DomainError::conflict(
                ConflictKind::RoundAlreadyResolved,
                format!("round {round_id} is already resolved"),
            ));
        }

        let prompt = self
            .records
            .prompt_card(round.prompt_card_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Card,
                    format!("prompt card {} not found", round.prompt_card_id),
                )
            })?;

        validate_submission(&prompt, user_card_ids, ai_card_ids)?;

        let (winner, explanation) = if identical_play(user_card_ids, ai_card_ids) {
            info!(round_id, "identical play, skipping oracle");
            (RoundWinner::Tie, IDENTICAL_PLAY_EXPLANATION.to_string())
        } else {
            let verdict = self
                .judge(&round, &prompt, user_card_ids, ai_card_ids)
                .await?;
            let winner = match verdict.winner {
                JudgedWinner::Human => RoundWinner::Human,
                JudgedWinner::Ai => RoundWinner::Ai,
            };
            (winner, verdict.explanation)
        };

        let (user_score, ai_score) = apply_score(round.user_score, round.ai_score, winner);

        let plays: Vec<PlayPair> = user_card_ids
            .iter()
            .zip(ai_card_ids.iter())
            .map(|(user_card_id, ai_card_id)| PlayPair {
                user_card_id: *user_card_id,
                ai_card_id: *ai_card_id,
            })
            .collect();

        let resolved = self
            .records
            .record_resolution(
                round_id,
                RoundResolution {
                    winner,
                    explanation,
                    user_score,
                    ai_score,
                },
                plays,
            )
            .await?;

        info!(
            round_id,
            session_id = round.session_id,
            winner = ?winner,
            user_score,
            ai_score,
            "round resolved"
        );

        Ok(resolved)
    }

    /// Invoke the oracle, bounded by the judge timeout. The round stays
    /// unresolved on any failure so the caller can resubmit.
    async fn judge(
        &self,
        round: &GameRound,
        prompt: &PromptCard,
        user_card_ids: &[i64],
        ai_card_ids: &[i64],
    ) -> Result<Verdict, DomainError> {
        let user_cards = self.load_cards(user_card_ids).await?;
        let ai_cards = self.load_cards(ai_card_ids).await?;

        let session = self
            .records
            .session(round.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Session,
                    format!("session {} not found", round.session_id),
                )
            })?;

        let personality = self
            .records
            .personality(session.ai_personality_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Personality,
                    format!("personality {} not found", session.ai_personality_id),
                )
            })?;

        let judged = timeout(
            self.judge_timeout,
            self.oracle.judge(prompt, &user_cards, &ai_cards, &personality),
        )
        .await;

        match judged {
            Err(_) => {
                warn!(round_id = round.id, "oracle timed out");
                Err(DomainError::oracle(
                    OracleKind::JudgingFailed,
                    format!("round {}: oracle timed out", round.id),
                ))
            }
            Ok(Err(DomainError::Oracle(_, detail))) => {
                warn!(round_id = round.id, %detail, "oracle failed, round left unresolved");
                Err(DomainError::oracle(
                    OracleKind::JudgingFailed,
                    format!("round {}: {detail}", round.id),
                ))
            }
            Ok(Err(other)) => Err(other),
            Ok(Ok(verdict)) => Ok(verdict),
        }
    }

    /// Fetch cards by id, preserving submission order.
    async fn load_cards(&self, ids: &[i64]) -> Result<Vec<ResponseCard>, DomainError> {
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
}

/// Check both id sets against the prompt card's contract.
fn validate_submission(
    prompt: &PromptCard,
    user_card_ids: &[i64],
    ai_card_ids: &[i64],
) -> Result<(), DomainError> {
    if user_card_ids.is_empty() || ai_card_ids.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSubmission,
            "both sides must submit at least one card",
        ));
    }

    if user_card_ids.len() != ai_card_ids.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSubmission,
            format!(
                "submission lengths differ: {} user cards vs {} ai cards",
                user_card_ids.len(),
                ai_card_ids.len()
            ),
        ));
    }

    if user_card_ids.len() != prompt.pick as usize {
        return Err(DomainError::validation(
            ValidationKind::InvalidSubmission,
            format!(
                "prompt expects {} card(s), got {}",
                prompt.pick,
                user_card_ids.len()
            ),
        ));
    }

    for side in [user_card_ids, ai_card_ids] {
        let distinct: BTreeSet<_> = side.iter().collect();
        if distinct.len() != side.len() {
            return Err(DomainError::validation(
                ValidationKind::InvalidSubmission,
                "submission contains duplicate card ids",
            ));
        }
    }

    Ok(())
}

/// Identical plays compare as sets; pairing order does not matter.
fn identical_play(user_card_ids: &[i64], ai_card_ids: &[i64]) -> bool {
    let user: BTreeSet<_> = user_card_ids.iter().collect();
    let ai: BTreeSet<_> = ai_card_ids.iter().collect();
    user == ai
}

/// The winning side's cumulative score goes up by 1; ties increment neither.
fn apply_score(user_score: i32, ai_score: i32, winner: RoundWinner) -> (i32, i32) {
    match winner {
        RoundWinner::Human => (user_score + 1, ai_score),
        RoundWinner::Ai => (user_score, ai_score + 1),
        RoundWinner::Tie => (user_score, ai_score),
    }
}

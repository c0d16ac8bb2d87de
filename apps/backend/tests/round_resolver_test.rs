mod common;
mod support;

use std::time::Duration;

use backend::config::game::GameConfig;
use backend::errors::domain::{ConflictKind, OracleKind, ValidationKind};
use backend::errors::DomainError;
use backend::repos::cards::CardFilter;
use backend::repos::rounds::RoundWinner;
use backend::services::oracle::JudgedWinner;
use backend::services::round_resolver::IDENTICAL_PLAY_EXPLANATION;
use support::{harness, harness_with, ScriptedOracle, TestHarness};

/// Start a session and return the id of its first (unresolved) round.
async fn started_round(h: &TestHarness) -> Result<i64, DomainError> {
    let user = h.records.seed_user("alice");
    let personality = h.records.seed_personality("Sarcastic", "drips with sarcasm");
    h.records.seed_prompt("My therapist says it's _.", 1);
    h.records.seed_responses(12);

    let session = h.flow.create_session(user.id, personality.id).await?;
    let round = h.flow.start_session(session.id, &CardFilter::any()).await?;
    Ok(round.id)
}

/// Identical plays short-circuit to a tie: the oracle is never invoked and
/// neither score moves.
#[tokio::test]
async fn identical_play_is_a_tie_without_judging() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let round_id = started_round(&h).await?;
    let card_id = h.records.seed_responses(1)[0].id;

    let resolved = h.flow.submit_round(round_id, &[card_id], &[card_id]).await?;

    assert_eq!(resolved.winner, Some(RoundWinner::Tie));
    assert_eq!(
        resolved.judge_explanation.as_deref(),
        Some(IDENTICAL_PLAY_EXPLANATION)
    );
    assert_eq!((resolved.user_score, resolved.ai_score), (0, 0));
    assert_eq!(h.oracle.judge_calls(), 0, "oracle must be skipped on ties");

    Ok(())
}

/// Resolution happens exactly once; a second submission fails and the first
/// resolution's scores stand.
#[tokio::test]
async fn double_resolution_is_rejected() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let round_id = started_round(&h).await?;
    let cards = h.records.seed_responses(4);

    h.oracle.push_verdict(JudgedWinner::Human, "clearly funnier");
    let first = h
        .flow
        .submit_round(round_id, &[cards[0].id], &[cards[1].id])
        .await?;
    assert_eq!((first.user_score, first.ai_score), (1, 0));

    h.oracle.push_verdict(JudgedWinner::Ai, "never judged");
    let err = h
        .flow
        .submit_round(round_id, &[cards[2].id], &[cards[3].id])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RoundAlreadyResolved, _)
    ));

    // scores and plays unchanged by the failed attempt
    let result = h.flow.get_round_result(round_id).await?;
    assert_eq!((result.round.user_score, result.round.ai_score), (1, 0));
    assert_eq!(result.round.winner, Some(RoundWinner::Human));
    assert_eq!(result.plays.len(), 1);
    assert_eq!(h.oracle.judge_calls(), 1);

    Ok(())
}

/// Oracle failure surfaces as JudgingFailed; the round stays unresolved and
/// the same submission succeeds on retry.
#[tokio::test]
async fn oracle_failure_leaves_round_retryable() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let round_id = started_round(&h).await?;
    let cards = h.records.seed_responses(2);

    h.oracle.push_judge_error(DomainError::oracle(
        OracleKind::Unavailable,
        "upstream 529",
    ));
    let err = h
        .flow
        .submit_round(round_id, &[cards[0].id], &[cards[1].id])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Oracle(OracleKind::JudgingFailed, _)
    ));

    // round must not transition to resolved on oracle failure
    let result = h.flow.get_round_result(round_id).await?;
    assert!(result.round.winner.is_none());
    assert_eq!(result.plays.len(), 0);
    assert_eq!(h.records.play_count(), 0);

    // resubmitting the same round succeeds
    h.oracle.push_verdict(JudgedWinner::Ai, "second time lucky");
    let resolved = h
        .flow
        .submit_round(round_id, &[cards[0].id], &[cards[1].id])
        .await?;
    assert_eq!(resolved.winner, Some(RoundWinner::Ai));
    assert_eq!((resolved.user_score, resolved.ai_score), (0, 1));

    Ok(())
}

/// A slow oracle is cut off by the judge timeout; the round stays
/// unresolved.
#[tokio::test]
async fn slow_oracle_times_out() -> Result<(), DomainError> {
    let config = GameConfig {
        judge_timeout: Duration::from_millis(50),
        ..GameConfig::default()
    };
    let h = harness_with(
        ScriptedOracle::always(JudgedWinner::Ai, "too late").with_delay(Duration::from_secs(5)),
        config,
    );
    let round_id = started_round(&h).await?;
    let cards = h.records.seed_responses(2);

    let err = h
        .flow
        .submit_round(round_id, &[cards[0].id], &[cards[1].id])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Oracle(OracleKind::JudgingFailed, _)
    ));

    let result = h.flow.get_round_result(round_id).await?;
    assert!(result.round.winner.is_none());

    Ok(())
}

#[tokio::test]
async fn malformed_submissions_are_rejected() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let round_id = started_round(&h).await?;
    let cards = h.records.seed_responses(6);

    // empty sides
    let err = h.flow.submit_round(round_id, &[], &[]).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSubmission, _)
    ));

    // length mismatch
    let err = h
        .flow
        .submit_round(round_id, &[cards[0].id, cards[1].id], &[cards[2].id])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSubmission, _)
    ));

    // wrong pick count (prompt expects 1)
    let err = h
        .flow
        .submit_round(
            round_id,
            &[cards[0].id, cards[1].id],
            &[cards[2].id, cards[3].id],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSubmission, _)
    ));

    assert_eq!(h.oracle.judge_calls(), 0);

    // the round is still submittable after rejected attempts
    h.oracle.push_verdict(JudgedWinner::Human, "finally valid");
    let resolved = h
        .flow
        .submit_round(round_id, &[cards[4].id], &[cards[5].id])
        .await?;
    assert_eq!(resolved.winner, Some(RoundWinner::Human));

    Ok(())
}

/// An invalid oracle selection propagates as a typed error from the AI-play
/// operation, never a crash.
#[tokio::test]
async fn invalid_oracle_selection_is_typed() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let round_id = started_round(&h).await?;
    let candidates: Vec<i64> = h.records.seed_responses(10).iter().map(|c| c.id).collect();

    h.oracle.push_selection_error(DomainError::oracle(
        OracleKind::InvalidSelection,
        "picked card 999 outside the candidate hand",
    ));

    let err = h.flow.ai_play(round_id, &candidates).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Oracle(OracleKind::InvalidSelection, _)
    ));

    Ok(())
}

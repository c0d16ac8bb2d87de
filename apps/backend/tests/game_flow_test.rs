mod common;
mod support;

use backend::errors::domain::{ConflictKind, DrawKind, NotFoundKind};
use backend::errors::DomainError;
use backend::repos::cards::CardFilter;
use backend::repos::rounds::RoundWinner;
use backend::repos::store::RecordStore;
use backend::services::oracle::JudgedWinner;
use backend::services::session_state::{SessionState, SessionStatus, SessionStore};
use support::{harness, ScriptedOracle};

/// Full first-round flow: create a session for "alice" + "Sarcastic", start,
/// submit round 1 with disjoint sets, oracle says (ai, "funnier"), advance
/// carries the scores into round 2.
#[tokio::test]
async fn end_to_end_first_round() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let alice = h.records.seed_user("alice");
    let sarcastic = h.records.seed_personality("Sarcastic", "drips with sarcasm");
    h.records.seed_prompt("Why can't I sleep at night? _", 1);
    let responses = h.records.seed_responses(20);

    let session = h.flow.create_session(alice.id, sarcastic.id).await?;
    assert_eq!(
        h.sessions.get(session.id).await?,
        Some(SessionState::created())
    );

    let round = h.flow.start_session(session.id, &CardFilter::any()).await?;
    assert_eq!(round.round_number, 1);
    assert_eq!((round.user_score, round.ai_score), (0, 0));
    assert!(round.winner.is_none());

    let deal = h.flow.deal(session.id, &CardFilter::any()).await?;
    assert_eq!(deal.round.id, round.id);
    assert_eq!(deal.hand.len(), 10);

    h.oracle.push_verdict(JudgedWinner::Ai, "funnier");
    let resolved = h
        .flow
        .submit_round(round.id, &[responses[0].id], &[responses[1].id])
        .await?;
    assert_eq!(resolved.winner, Some(RoundWinner::Ai));
    assert_eq!(resolved.judge_explanation.as_deref(), Some("funnier"));
    assert_eq!((resolved.user_score, resolved.ai_score), (0, 1));

    // one CardPlay row per paired slot
    let result = h.flow.get_round_result(round.id).await?;
    assert_eq!(result.plays.len(), 1);
    assert_eq!(result.plays[0].user_card_id, responses[0].id);
    assert_eq!(result.plays[0].ai_card_id, responses[1].id);
    assert_eq!(result.plays[0].play_order, 0);

    // scores mirrored into ephemeral state
    assert_eq!(
        h.sessions.get(session.id).await?,
        Some(SessionState::in_progress(1, 0, 1))
    );

    // advance: round 2 carries (0, 1) forward
    let next = h
        .flow
        .advance_round(session.id, &CardFilter::any())
        .await?
        .expect("session should continue past round 1");
    assert_eq!(next.round_number, 2);
    assert_eq!((next.user_score, next.ai_score), (0, 1));
    assert!(next.winner.is_none());

    Ok(())
}

/// Admission is rejected before any durable write once the active-user set
/// reaches the limit.
#[tokio::test]
async fn capacity_rejection_before_durable_write() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let alice = h.records.seed_user("alice");
    let personality = h.records.seed_personality("Dry", "deadpan");

    for user_id in 0..100 {
        h.sessions.add_active_user(user_id).await?;
    }

    let err = h
        .flow
        .create_session(alice.id, personality.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AtCapacity, _)
    ));
    assert_eq!(h.records.session_count(), 0);

    let err = h.flow.connect_user("bob").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AtCapacity, _)
    ));
    assert!(h.records.user_by_username("bob").await?.is_none());

    // one slot frees up; admission succeeds again
    h.sessions.remove_active_user(0).await?;
    h.flow.connect_user("bob").await?;

    Ok(())
}

/// Round numbers increase by 1 with no gaps; the session completes exactly
/// once, at round 10, with frozen scores.
#[tokio::test]
async fn ten_rounds_then_completion() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::always(JudgedWinner::Human, "humans rule"));
    let user = h.records.seed_user("carol");
    let personality = h.records.seed_personality("Smug", "insufferably smug");
    h.records.seed_prompt("The secret to happiness is _", 1);
    let responses = h.records.seed_responses(30);

    let session = h.flow.create_session(user.id, personality.id).await?;
    let mut round = h.flow.start_session(session.id, &CardFilter::any()).await?;

    for played in 1..=10u8 {
        assert_eq!(round.round_number, played);

        let resolved = h
            .flow
            .submit_round(
                round.id,
                &[responses[played as usize].id],
                &[responses[(played + 10) as usize].id],
            )
            .await?;
        assert_eq!((resolved.user_score, resolved.ai_score), (played as i32, 0));

        match h.flow.advance_round(session.id, &CardFilter::any()).await? {
            Some(next) => {
                assert!(played < 10, "session should have ended after round 10");
                round = next;
            }
            None => {
                assert_eq!(played, 10, "session ended early at round {played}");
                break;
            }
        }
    }

    // durable: end_time set, rounds gapless 1..=10
    let view = h.flow.get_session(session.id).await?;
    assert!(view.session.end_time.is_some());
    assert_eq!(view.state.status, SessionStatus::Completed);
    assert_eq!((view.state.user_score, view.state.ai_score), (10, 0));

    let rounds = h.records.rounds_for_session(session.id).await?;
    let numbers: Vec<u8> = rounds.iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, (1..=10).collect::<Vec<u8>>());

    // completion happens exactly once
    let err = h
        .flow
        .advance_round(session.id, &CardFilter::any())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::SessionCompleted, _)
    ));

    Ok(())
}

#[tokio::test]
async fn start_twice_fails_with_already_started() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let user = h.records.seed_user("dave");
    let personality = h.records.seed_personality("Chipper", "relentlessly upbeat");
    h.records.seed_prompt("_: the real reason I'm late.", 1);
    h.records.seed_responses(12);

    let session = h.flow.create_session(user.id, personality.id).await?;
    h.flow.start_session(session.id, &CardFilter::any()).await?;

    let err = h
        .flow
        .start_session(session.id, &CardFilter::any())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyStarted, _)
    ));

    Ok(())
}

/// Advancing with the current round unresolved is refused: only one
/// outstanding round per session.
#[tokio::test]
async fn advance_requires_resolved_round() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let user = h.records.seed_user("erin");
    let personality = h.records.seed_personality("Weary", "seen it all");
    h.records.seed_prompt("I blame _.", 1);
    h.records.seed_responses(12);

    let session = h.flow.create_session(user.id, personality.id).await?;
    h.flow.start_session(session.id, &CardFilter::any()).await?;

    let err = h
        .flow
        .advance_round(session.id, &CardFilter::any())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RoundUnresolved, _)
    ));

    Ok(())
}

/// Ephemeral state is a cache: losing it is harmless, the orchestrator
/// rebuilds it from the latest durable round and repairs the store.
#[tokio::test]
async fn session_state_rebuilds_from_durable_rounds() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::always(JudgedWinner::Ai, "machine wit"));
    let user = h.records.seed_user("fay");
    let personality = h.records.seed_personality("Gothic", "brooding");
    h.records.seed_prompt("Behind the curtain: _", 1);
    let responses = h.records.seed_responses(12);

    let session = h.flow.create_session(user.id, personality.id).await?;
    let round = h.flow.start_session(session.id, &CardFilter::any()).await?;
    h.flow
        .submit_round(round.id, &[responses[0].id], &[responses[1].id])
        .await?;

    // simulate ephemeral store loss
    h.sessions.delete(session.id).await?;

    let view = h.flow.get_session(session.id).await?;
    assert_eq!(view.state, SessionState::in_progress(1, 0, 1));

    // the cache entry was repaired on read
    assert_eq!(
        h.sessions.get(session.id).await?,
        Some(SessionState::in_progress(1, 0, 1))
    );

    Ok(())
}

#[tokio::test]
async fn deal_fails_when_response_pool_is_short() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let user = h.records.seed_user("gus");
    let personality = h.records.seed_personality("Terse", "few words");
    h.records.seed_prompt("All I need is _.", 1);
    h.records.seed_responses(8); // hand size is 10

    let session = h.flow.create_session(user.id, personality.id).await?;
    h.flow.start_session(session.id, &CardFilter::any()).await?;

    let err = h
        .flow
        .deal(session.id, &CardFilter::any())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Draw(DrawKind::InsufficientCards, _)
    ));

    Ok(())
}

#[tokio::test]
async fn ai_play_returns_oracle_selection_in_order() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let user = h.records.seed_user("hana");
    let personality = h.records.seed_personality("Chaotic", "pure chaos");
    h.records.seed_prompt("First _, then _.", 2);
    let responses = h.records.seed_responses(12);

    let session = h.flow.create_session(user.id, personality.id).await?;
    let round = h.flow.start_session(session.id, &CardFilter::any()).await?;

    let candidates: Vec<i64> = responses.iter().take(10).map(|c| c.id).collect();
    h.oracle
        .push_selection(vec![candidates[4], candidates[1]]);

    let chosen = h.flow.ai_play(round.id, &candidates).await?;
    let chosen_ids: Vec<i64> = chosen.iter().map(|c| c.id).collect();
    assert_eq!(chosen_ids, vec![candidates[4], candidates[1]]);
    assert_eq!(h.oracle.choose_calls(), 1);

    Ok(())
}

#[tokio::test]
async fn unknown_references_are_not_found() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let user = h.records.seed_user("ivy");
    let personality = h.records.seed_personality("Vain", "admires itself");

    let err = h
        .flow
        .create_session(9999, personality.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::User, _)));

    let err = h.flow.create_session(user.id, 9999).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Personality, _)
    ));

    let err = h.flow.get_session(424242).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Session, _)
    ));

    Ok(())
}

/// Users are created on first use and reused afterwards; session history
/// lists a user's sessions.
#[tokio::test]
async fn ensure_user_and_history() -> Result<(), DomainError> {
    let h = harness(ScriptedOracle::new());
    let personality = h.records.seed_personality("Folksy", "down home");

    let user = h.flow.ensure_user("jo").await?;
    let again = h.flow.ensure_user("jo").await?;
    assert_eq!(user.id, again.id);

    let s1 = h.flow.create_session(user.id, personality.id).await?;
    let s2 = h.flow.create_session(user.id, personality.id).await?;

    let history = h.flow.session_history(user.id).await?;
    let ids: Vec<i64> = history.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![s1.id, s2.id]);

    Ok(())
}

//! Game session and round routes.

use actix_web::{web, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::cards::{CardFilter, PromptCard, ResponseCard};
use crate::repos::rounds::{GameRound, RoundWinner};
use crate::repos::sessions::GameSession;
use crate::services::game_flow::RoundResult;
use crate::services::session_state::SessionState;
use crate::state::app_state::AppState;

// ---- wire DTOs ----

#[derive(Deserialize)]
struct CreateSessionRequest {
    user_id: i64,
    ai_personality_id: i64,
}

#[derive(Serialize)]
struct SessionResponse {
    id: i64,
    user_id: i64,
    ai_personality_id: i64,
    start_time: String,
    end_time: Option<String>,
}

impl From<GameSession> for SessionResponse {
    fn from(session: GameSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            ai_personality_id: session.ai_personality_id,
            start_time: session.start_time.to_string(),
            end_time: session.end_time.map(|t| t.to_string()),
        }
    }
}

#[derive(Serialize)]
struct SessionViewResponse {
    session: SessionResponse,
    state: SessionState,
}

#[derive(Serialize)]
struct RoundResponse {
    id: i64,
    session_id: i64,
    round_number: u8,
    prompt_card_id: i64,
    user_score: i32,
    ai_score: i32,
    winner: Option<RoundWinner>,
    judge_explanation: Option<String>,
}

impl From<GameRound> for RoundResponse {
    fn from(round: GameRound) -> Self {
        Self {
            id: round.id,
            session_id: round.session_id,
            round_number: round.round_number,
            prompt_card_id: round.prompt_card_id,
            user_score: round.user_score,
            ai_score: round.ai_score,
            winner: round.winner,
            judge_explanation: round.judge_explanation,
        }
    }
}

#[derive(Serialize)]
struct PromptCardResponse {
    id: i64,
    text: String,
    pick: u8,
}

impl From<PromptCard> for PromptCardResponse {
    fn from(card: PromptCard) -> Self {
        Self {
            id: card.id,
            text: card.text,
            pick: card.pick,
        }
    }
}

#[derive(Serialize)]
struct ResponseCardResponse {
    id: i64,
    text: String,
}

impl From<ResponseCard> for ResponseCardResponse {
    fn from(card: ResponseCard) -> Self {
        Self {
            id: card.id,
            text: card.text,
        }
    }
}

#[derive(Serialize)]
struct DealResponse {
    round: RoundResponse,
    prompt: PromptCardResponse,
    hand: Vec<ResponseCardResponse>,
}

#[derive(Deserialize)]
struct AiPlayRequest {
    candidate_card_ids: Vec<i64>,
}

#[derive(Deserialize)]
struct SubmitRoundRequest {
    user_card_ids: Vec<i64>,
    ai_card_ids: Vec<i64>,
}

#[derive(Serialize)]
struct PlayResponse {
    user_card_id: i64,
    ai_card_id: i64,
    play_order: i16,
}

#[derive(Serialize)]
struct RoundResultResponse {
    round: RoundResponse,
    plays: Vec<PlayResponse>,
}

impl From<RoundResult> for RoundResultResponse {
    fn from(result: RoundResult) -> Self {
        Self {
            round: RoundResponse::from(result.round),
            plays: result
                .plays
                .into_iter()
                .map(|play| PlayResponse {
                    user_card_id: play.user_card_id,
                    ai_card_id: play.ai_card_id,
                    play_order: play.play_order,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct AdvanceResponse {
    /// The next round, absent when the session just completed.
    round: Option<RoundResponse>,
    completed: bool,
}

#[derive(Serialize)]
struct CapacityResponse {
    active_users: u64,
    available_slots: u64,
    max_users: u64,
}

/// Optional card pool filter carried as query parameters.
#[derive(Deserialize, Default)]
struct CardFilterQuery {
    watermark: Option<String>,
    category: Option<String>,
}

impl From<CardFilterQuery> for CardFilter {
    fn from(query: CardFilterQuery) -> Self {
        Self {
            watermark: query.watermark,
            category: query.category,
        }
    }
}

// ---- handlers ----

/// POST /game-sessions
async fn create_session(
    body: web::Json<CreateSessionRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<SessionResponse>, AppError> {
    let session = app_state
        .flow
        .create_session(body.user_id, body.ai_personality_id)
        .await?;
    Ok(web::Json(SessionResponse::from(session)))
}

/// GET /game-sessions/{session_id}
async fn get_session(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<SessionViewResponse>, AppError> {
    let view = app_state.flow.get_session(path.into_inner()).await?;
    Ok(web::Json(SessionViewResponse {
        session: SessionResponse::from(view.session),
        state: view.state,
    }))
}

/// POST /game-sessions/{session_id}/start
async fn start_session(
    path: web::Path<i64>,
    query: web::Query<CardFilterQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RoundResponse>, AppError> {
    let filter = CardFilter::from(query.into_inner());
    let round = app_state
        .flow
        .start_session(path.into_inner(), &filter)
        .await?;
    Ok(web::Json(RoundResponse::from(round)))
}

/// POST /game-sessions/{session_id}/draw
///
/// Current round, its prompt card, and a fresh hand of response cards.
async fn draw_hand(
    path: web::Path<i64>,
    query: web::Query<CardFilterQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<DealResponse>, AppError> {
    let filter = CardFilter::from(query.into_inner());
    let deal = app_state.flow.deal(path.into_inner(), &filter).await?;
    Ok(web::Json(DealResponse {
        round: RoundResponse::from(deal.round),
        prompt: PromptCardResponse::from(deal.prompt),
        hand: deal
            .hand
            .into_iter()
            .map(ResponseCardResponse::from)
            .collect(),
    }))
}

/// POST /game-sessions/{session_id}/advance
async fn advance_round(
    path: web::Path<i64>,
    query: web::Query<CardFilterQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdvanceResponse>, AppError> {
    let filter = CardFilter::from(query.into_inner());
    let next = app_state
        .flow
        .advance_round(path.into_inner(), &filter)
        .await?;
    let completed = next.is_none();
    Ok(web::Json(AdvanceResponse {
        round: next.map(RoundResponse::from),
        completed,
    }))
}

/// GET /history/{user_id}
async fn session_history(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<SessionResponse>>, AppError> {
    let sessions = app_state.flow.session_history(path.into_inner()).await?;
    Ok(web::Json(
        sessions.into_iter().map(SessionResponse::from).collect(),
    ))
}

/// POST /game-rounds/{round_id}/ai-play
///
/// Ask the oracle to play the AI side from candidate cards.
async fn ai_play(
    path: web::Path<i64>,
    body: web::Json<AiPlayRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<ResponseCardResponse>>, AppError> {
    let chosen = app_state
        .flow
        .ai_play(path.into_inner(), &body.candidate_card_ids)
        .await?;
    Ok(web::Json(
        chosen.into_iter().map(ResponseCardResponse::from).collect(),
    ))
}

/// POST /game-rounds/{round_id}/submit
async fn submit_round(
    path: web::Path<i64>,
    body: web::Json<SubmitRoundRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RoundResponse>, AppError> {
    let round = app_state
        .flow
        .submit_round(path.into_inner(), &body.user_card_ids, &body.ai_card_ids)
        .await?;
    Ok(web::Json(RoundResponse::from(round)))
}

/// GET /game-rounds/{round_id}/result
async fn round_result(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RoundResultResponse>, AppError> {
    let result = app_state.flow.get_round_result(path.into_inner()).await?;
    Ok(web::Json(RoundResultResponse::from(result)))
}

/// GET /status
async fn capacity_status(
    app_state: web::Data<AppState>,
) -> Result<web::Json<CapacityResponse>, AppError> {
    let status = app_state.flow.capacity_status().await?;
    Ok(web::Json(CapacityResponse {
        active_users: status.active_users,
        available_slots: status.available_slots,
        max_users: status.max_users,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/game-sessions").route(web::post().to(create_session)));
    cfg.service(web::resource("/game-sessions/{session_id}").route(web::get().to(get_session)));
    cfg.service(
        web::resource("/game-sessions/{session_id}/start").route(web::post().to(start_session)),
    );
    cfg.service(web::resource("/game-sessions/{session_id}/draw").route(web::post().to(draw_hand)));
    cfg.service(
        web::resource("/game-sessions/{session_id}/advance").route(web::post().to(advance_round)),
    );
    cfg.service(web::resource("/history/{user_id}").route(web::get().to(session_history)));
    cfg.service(web::resource("/game-rounds/{round_id}/ai-play").route(web::post().to(ai_play)));
    cfg.service(web::resource("/game-rounds/{round_id}/submit").route(web::post().to(submit_round)));
    cfg.service(web::resource("/game-rounds/{round_id}/result").route(web::get().to(round_result)));
    cfg.service(web::resource("/status").route(web::get().to(capacity_status)));
}

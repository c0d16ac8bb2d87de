//! SeaORM adapter for the game_rounds table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::game_rounds;

/// Fields for a new, unresolved round.
#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub session_id: i64,
    pub round_number: i16,
    pub prompt_card_id: i64,
    pub user_score: i32,
    pub ai_score: i32,
}

/// Resolution fields written exactly once per round.
#[derive(Debug, Clone)]
pub struct RoundResolve {
    pub round_id: i64,
    pub winner: game_rounds::RoundWinner,
    pub judge_explanation: String,
    pub user_score: i32,
    pub ai_score: i32,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find_by_id(round_id).one(conn).await
}

/// Find the highest-numbered round of a session.
pub async fn find_latest_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::SessionId.eq(session_id))
        .order_by_desc(game_rounds::Column::RoundNumber)
        .one(conn)
        .await
}

/// Find all rounds for a session (ordered by round_number)
pub async fn find_all_by_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::SessionId.eq(session_id))
        .order_by_asc(game_rounds::Column::RoundNumber)
        .all(conn)
        .await
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<game_rounds::Model, sea_orm::DbErr> {
    let round = game_rounds::ActiveModel {
        id: sea_orm::NotSet,
        session_id: Set(dto.session_id),
        round_number: Set(dto.round_number),
        prompt_card_id: Set(dto.prompt_card_id),
        user_score: Set(dto.user_score),
        ai_score: Set(dto.ai_score),
        winner: Set(None),
        judge_explanation: Set(None),
    };

    round.insert(conn).await
}

/// Write winner, explanation, and cumulative scores onto a round.
pub async fn resolve_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundResolve,
) -> Result<game_rounds::Model, sea_orm::DbErr> {
    let round = find_by_id(conn, dto.round_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Round not found".to_string()))?;

    let mut round: game_rounds::ActiveModel = round.into();
    round.winner = Set(Some(dto.winner));
    round.judge_explanation = Set(Some(dto.judge_explanation));
    round.user_score = Set(dto.user_score);
    round.ai_score = Set(dto.ai_score);

    round.update(conn).await
}

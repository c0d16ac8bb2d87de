//! SeaORM adapter for the game_sessions table.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::game_sessions;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<game_sessions::Model>, sea_orm::DbErr> {
    game_sessions::Entity::find_by_id(session_id).one(conn).await
}

pub async fn find_all_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<game_sessions::Model>, sea_orm::DbErr> {
    game_sessions::Entity::find()
        .filter(game_sessions::Column::UserId.eq(user_id))
        .order_by_asc(game_sessions::Column::Id)
        .all(conn)
        .await
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    ai_personality_id: i64,
) -> Result<game_sessions::Model, sea_orm::DbErr> {
    let session = game_sessions::ActiveModel {
        id: sea_orm::NotSet,
        user_id: Set(user_id),
        ai_personality_id: Set(ai_personality_id),
        start_time: Set(time::OffsetDateTime::now_utc()),
        end_time: Set(None),
    };

    session.insert(conn).await
}

/// Stamp end_time on a session. The caller guarantees it is only set once.
pub async fn set_end_time<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<game_sessions::Model, sea_orm::DbErr> {
    let session = find_by_id(conn, session_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Session not found".to_string()))?;

    let mut session: game_sessions::ActiveModel = session.into();
    session.end_time = Set(Some(time::OffsetDateTime::now_utc()));

    session.update(conn).await
}

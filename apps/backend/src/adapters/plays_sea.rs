//! SeaORM adapter for the card_plays table.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::card_plays;

/// One paired play slot; play_order is the pairing index.
#[derive(Debug, Clone)]
pub struct PlayCreate {
    pub round_id: i64,
    pub user_card_id: i64,
    pub ai_card_id: i64,
    pub play_order: i16,
}

pub async fn insert_plays<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    plays: Vec<PlayCreate>,
) -> Result<Vec<card_plays::Model>, sea_orm::DbErr> {
    let mut inserted = Vec::with_capacity(plays.len());
    for dto in plays {
        let play = card_plays::ActiveModel {
            id: sea_orm::NotSet,
            round_id: Set(dto.round_id),
            user_card_id: Set(dto.user_card_id),
            ai_card_id: Set(dto.ai_card_id),
            play_order: Set(dto.play_order),
        };
        inserted.push(play.insert(conn).await?);
    }
    Ok(inserted)
}

pub async fn find_all_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<card_plays::Model>, sea_orm::DbErr> {
    card_plays::Entity::find()
        .filter(card_plays::Column::RoundId.eq(round_id))
        .order_by_asc(card_plays::Column::PlayOrder)
        .all(conn)
        .await
}

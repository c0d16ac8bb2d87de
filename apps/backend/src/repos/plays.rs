//! Card play repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::plays_sea as plays_adapter;
use crate::entities::card_plays;
use crate::errors::DomainError;

use super::map_db_err;

/// One paired play slot of a resolved round; `play_order` is the 0-based
/// pairing index of the simultaneous submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlay {
    pub id: i64,
    pub round_id: i64,
    pub user_card_id: i64,
    pub ai_card_id: i64,
    pub play_order: i16,
}

pub async fn find_all_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<CardPlay>, DomainError> {
    let plays = plays_adapter::find_all_by_round(conn, round_id)
        .await
        .map_err(map_db_err)?;
    Ok(plays.into_iter().map(CardPlay::from).collect())
}

impl From<card_plays::Model> for CardPlay {
    fn from(model: card_plays::Model) -> Self {
        Self {
            id: model.id,
            round_id: model.round_id,
            user_card_id: model.user_card_id,
            ai_card_id: model.ai_card_id,
            play_order: model.play_order,
        }
    }
}

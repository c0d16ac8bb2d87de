use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_plays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "round_id")]
    pub round_id: i64,
    #[sea_orm(column_name = "user_card_id")]
    pub user_card_id: i64,
    #[sea_orm(column_name = "ai_card_id")]
    pub ai_card_id: i64,
    #[sea_orm(column_name = "play_order", column_type = "SmallInteger")]
    pub play_order: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game_rounds::Entity",
        from = "Column::RoundId",
        to = "super::game_rounds::Column::Id"
    )]
    GameRound,
    #[sea_orm(
        belongs_to = "super::response_cards::Entity",
        from = "Column::UserCardId",
        to = "super::response_cards::Column::Id"
    )]
    UserCard,
    #[sea_orm(
        belongs_to = "super::response_cards::Entity",
        from = "Column::AiCardId",
        to = "super::response_cards::Column::Id"
    )]
    AiCard,
}

impl Related<super::game_rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameRound.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "round_winner")]
pub enum RoundWinner {
    #[sea_orm(string_value = "HUMAN")]
    Human,
    #[sea_orm(string_value = "AI")]
    Ai,
    #[sea_orm(string_value = "TIE")]
    Tie,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "session_id")]
    pub session_id: i64,
    #[sea_orm(column_name = "round_number", column_type = "SmallInteger")]
    pub round_number: i16,
    #[sea_orm(column_name = "prompt_card_id")]
    pub prompt_card_id: i64,
    #[sea_orm(column_name = "user_score")]
    pub user_score: i32,
    #[sea_orm(column_name = "ai_score")]
    pub ai_score: i32,
    pub winner: Option<RoundWinner>,
    #[sea_orm(column_name = "judge_explanation", column_type = "Text", nullable)]
    pub judge_explanation: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game_sessions::Entity",
        from = "Column::SessionId",
        to = "super::game_sessions::Column::Id"
    )]
    GameSession,
    #[sea_orm(
        belongs_to = "super::prompt_cards::Entity",
        from = "Column::PromptCardId",
        to = "super::prompt_cards::Column::Id"
    )]
    PromptCard,
    #[sea_orm(has_many = "super::card_plays::Entity")]
    CardPlays,
}

impl Related<super::game_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameSession.def()
    }
}

impl Related<super::prompt_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromptCard.def()
    }
}

impl Related<super::card_plays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardPlays.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

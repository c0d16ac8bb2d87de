use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;
use sea_orm_migration::sea_query::extension::postgres::Type as PgType;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    CreatedAt,
}

#[derive(Iden)]
enum AiPersonalities {
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum PromptCards {
    Table,
    Id,
    Text,
    Pick,
    Watermark,
    Category,
}

#[derive(Iden)]
enum ResponseCards {
    Table,
    Id,
    Text,
    Watermark,
    Category,
}

#[derive(Iden)]
enum GameSessions {
    Table,
    Id,
    UserId,
    AiPersonalityId,
    StartTime,
    EndTime,
}

#[derive(Iden)]
enum GameRounds {
    Table,
    Id,
    SessionId,
    RoundNumber,
    PromptCardId,
    UserScore,
    AiScore,
    Winner,
    JudgeExplanation,
}

#[derive(Iden)]
enum CardPlays {
    Table,
    Id,
    RoundId,
    UserCardId,
    AiCardId,
    PlayOrder,
}

#[derive(Iden)]
enum RoundWinnerEnum {
    #[iden = "round_winner"]
    Type,
}

async fn enum_exists(manager: &SchemaManager<'_>, name: &str) -> Result<bool, DbErr> {
    let db = manager.get_connection();
    let result = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT 1 FROM pg_type WHERE typname = '{name}'"),
        ))
        .await?;
    Ok(result.is_some())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // round_winner enum (Postgres only; SQLite stores it as TEXT)
        match manager.get_database_backend() {
            sea_orm_migration::sea_orm::DatabaseBackend::Postgres => {
                if !enum_exists(manager, "round_winner").await? {
                    manager
                        .create_type(
                            PgType::create()
                                .as_enum(RoundWinnerEnum::Type)
                                .values(["HUMAN", "AI", "TIE"])
                                .to_owned(),
                        )
                        .await?;
                }
            }
            sea_orm_migration::sea_orm::DatabaseBackend::Sqlite => {}
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ai_personalities
        manager
            .create_table(
                Table::create()
                    .table(AiPersonalities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiPersonalities::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(AiPersonalities::Name).string().not_null())
                    .col(ColumnDef::new(AiPersonalities::Description).text().null())
                    .col(ColumnDef::new(AiPersonalities::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(AiPersonalities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_personalities_created_by")
                            .from(AiPersonalities::Table, AiPersonalities::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_ai_personalities_name")
                    .table(AiPersonalities::Table)
                    .col(AiPersonalities::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // prompt_cards
        manager
            .create_table(
                Table::create()
                    .table(PromptCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromptCards::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(PromptCards::Text).text().not_null())
                    .col(ColumnDef::new(PromptCards::Pick).small_integer().not_null())
                    .col(ColumnDef::new(PromptCards::Watermark).string().null())
                    .col(ColumnDef::new(PromptCards::Category).string().null())
                    .to_owned(),
            )
            .await?;

        // response_cards
        manager
            .create_table(
                Table::create()
                    .table(ResponseCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResponseCards::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(ResponseCards::Text).text().not_null())
                    .col(ColumnDef::new(ResponseCards::Watermark).string().null())
                    .col(ColumnDef::new(ResponseCards::Category).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_response_cards_watermark")
                    .table(ResponseCards::Table)
                    .col(ResponseCards::Watermark)
                    .to_owned(),
            )
            .await?;

        // game_sessions
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameSessions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameSessions::AiPersonalityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_user")
                            .from(GameSessions::Table, GameSessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_personality")
                            .from(GameSessions::Table, GameSessions::AiPersonalityId)
                            .to(AiPersonalities::Table, AiPersonalities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_game_sessions_user_id")
                    .table(GameSessions::Table)
                    .col(GameSessions::UserId)
                    .to_owned(),
            )
            .await?;

        // game_rounds
        manager
            .create_table(
                Table::create()
                    .table(GameRounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameRounds::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GameRounds::SessionId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameRounds::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::PromptCardId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameRounds::UserScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GameRounds::AiScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GameRounds::Winner)
                            .custom(RoundWinnerEnum::Type)
                            .null(),
                    )
                    .col(ColumnDef::new(GameRounds::JudgeExplanation).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_rounds_session")
                            .from(GameRounds::Table, GameRounds::SessionId)
                            .to(GameSessions::Table, GameSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_rounds_prompt_card")
                            .from(GameRounds::Table, GameRounds::PromptCardId)
                            .to(PromptCards::Table, PromptCards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_rounds_session_round")
                    .table(GameRounds::Table)
                    .col(GameRounds::SessionId)
                    .col(GameRounds::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // card_plays
        manager
            .create_table(
                Table::create()
                    .table(CardPlays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardPlays::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(CardPlays::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(CardPlays::UserCardId).big_integer().not_null())
                    .col(ColumnDef::new(CardPlays::AiCardId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CardPlays::PlayOrder)
                            .small_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_plays_round")
                            .from(CardPlays::Table, CardPlays::RoundId)
                            .to(GameRounds::Table, GameRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_plays_user_card")
                            .from(CardPlays::Table, CardPlays::UserCardId)
                            .to(ResponseCards::Table, ResponseCards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_plays_ai_card")
                            .from(CardPlays::Table, CardPlays::AiCardId)
                            .to(ResponseCards::Table, ResponseCards::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_card_plays_round_order")
                    .table(CardPlays::Table)
                    .col(CardPlays::RoundId)
                    .col(CardPlays::PlayOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse dependency order

        manager
            .drop_table(Table::drop().table(CardPlays::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GameRounds::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GameSessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ResponseCards::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PromptCards::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AiPersonalities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        if manager.get_database_backend() == sea_orm_migration::sea_orm::DatabaseBackend::Postgres {
            manager
                .drop_type(PgType::drop().name(RoundWinnerEnum::Type).to_owned())
                .await?;
        }

        Ok(())
    }
}

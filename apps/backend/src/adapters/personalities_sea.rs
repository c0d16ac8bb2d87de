//! SeaORM adapter for the ai_personalities table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::ai_personalities;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    personality_id: i64,
) -> Result<Option<ai_personalities::Model>, sea_orm::DbErr> {
    ai_personalities::Entity::find_by_id(personality_id)
        .one(conn)
        .await
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<ai_personalities::Model>, sea_orm::DbErr> {
    ai_personalities::Entity::find()
        .filter(ai_personalities::Column::Name.eq(name))
        .one(conn)
        .await
}

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<ai_personalities::Model>, sea_orm::DbErr> {
    ai_personalities::Entity::find()
        .order_by_asc(ai_personalities::Column::Id)
        .all(conn)
        .await
}

pub async fn create_personality<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    description: Option<&str>,
    created_by: Option<i64>,
) -> Result<ai_personalities::Model, sea_orm::DbErr> {
    let personality = ai_personalities::ActiveModel {
        id: sea_orm::NotSet,
        name: Set(name.to_string()),
        description: Set(description.map(|d| d.to_string())),
        created_by: Set(created_by),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    personality.insert(conn).await
}

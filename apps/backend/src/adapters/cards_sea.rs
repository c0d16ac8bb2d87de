//! SeaORM adapter for the prompt_cards and response_cards tables.
//!
//! Pool queries take the watermark/category filter as explicit parameters;
//! drawing itself happens in the card drawer over the returned pool view.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{prompt_cards, response_cards};

pub async fn find_prompt_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<Option<prompt_cards::Model>, sea_orm::DbErr> {
    prompt_cards::Entity::find_by_id(card_id).one(conn).await
}

pub async fn find_all_prompts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    watermark: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<prompt_cards::Model>, sea_orm::DbErr> {
    let mut query = prompt_cards::Entity::find();
    if let Some(watermark) = watermark {
        query = query.filter(prompt_cards::Column::Watermark.eq(watermark));
    }
    if let Some(category) = category {
        query = query.filter(prompt_cards::Column::Category.eq(category));
    }
    query.all(conn).await
}

pub async fn find_all_responses<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    watermark: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<response_cards::Model>, sea_orm::DbErr> {
    let mut query = response_cards::Entity::find();
    if let Some(watermark) = watermark {
        query = query.filter(response_cards::Column::Watermark.eq(watermark));
    }
    if let Some(category) = category {
        query = query.filter(response_cards::Column::Category.eq(category));
    }
    query.all(conn).await
}

pub async fn find_responses_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_ids: &[i64],
) -> Result<Vec<response_cards::Model>, sea_orm::DbErr> {
    response_cards::Entity::find()
        .filter(response_cards::Column::Id.is_in(card_ids.iter().copied()))
        .all(conn)
        .await
}

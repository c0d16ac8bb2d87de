//! AI personality repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::personalities_sea as personalities_adapter;
use crate::entities::ai_personalities;
use crate::errors::DomainError;

use super::map_db_err;

/// AI personality domain model. The description biases the oracle's style.
#[derive(Debug, Clone, PartialEq)]
pub struct AiPersonality {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: time::OffsetDateTime,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    personality_id: i64,
) -> Result<Option<AiPersonality>, DomainError> {
    let personality = personalities_adapter::find_by_id(conn, personality_id)
        .await
        .map_err(map_db_err)?;
    Ok(personality.map(AiPersonality::from))
}

pub async fn find_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<AiPersonality>, DomainError> {
    let personality = personalities_adapter::find_by_name(conn, name)
        .await
        .map_err(map_db_err)?;
    Ok(personality.map(AiPersonality::from))
}

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<AiPersonality>, DomainError> {
    let personalities = personalities_adapter::find_all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(personalities.into_iter().map(AiPersonality::from).collect())
}

pub async fn create_personality<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    description: Option<&str>,
    created_by: Option<i64>,
) -> Result<AiPersonality, DomainError> {
    let personality =
        personalities_adapter::create_personality(conn, name, description, created_by)
            .await
            .map_err(map_db_err)?;
    Ok(AiPersonality::from(personality))
}

impl From<ai_personalities::Model> for AiPersonality {
    fn from(model: ai_personalities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

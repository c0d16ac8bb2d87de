//! Card repository functions for the domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::cards_sea as cards_adapter;
use crate::entities::{prompt_cards, response_cards};
use crate::errors::DomainError;

use super::map_db_err;

/// Prompt card domain model (the round's fill-in-the-blank prompt).
#[derive(Debug, Clone, PartialEq)]
pub struct PromptCard {
    pub id: i64,
    pub text: String,
    /// Number of response cards the prompt expects, >= 1.
    pub pick: u8,
    pub watermark: Option<String>,
    pub category: Option<String>,
}

/// Response card domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCard {
    pub id: i64,
    pub text: String,
    pub watermark: Option<String>,
    pub category: Option<String>,
}

/// Pool eligibility filter. An explicit parameter on every pool query —
/// never a hidden default (e.g. regional card sets via watermark).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardFilter {
    pub watermark: Option<String>,
    pub category: Option<String>,
}

impl CardFilter {
    pub fn any() -> Self {
        Self::default()
    }
}

pub async fn find_prompt_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<Option<PromptCard>, DomainError> {
    let card = cards_adapter::find_prompt_by_id(conn, card_id)
        .await
        .map_err(map_db_err)?;
    Ok(card.map(PromptCard::from))
}

/// Eligible prompt card pool view for the given filter.
pub async fn prompt_pool<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CardFilter,
) -> Result<Vec<PromptCard>, DomainError> {
    let cards =
        cards_adapter::find_all_prompts(conn, filter.watermark.as_deref(), filter.category.as_deref())
            .await
            .map_err(map_db_err)?;
    Ok(cards.into_iter().map(PromptCard::from).collect())
}

/// Eligible response card pool view for the given filter.
pub async fn response_pool<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: &CardFilter,
) -> Result<Vec<ResponseCard>, DomainError> {
    let cards = cards_adapter::find_all_responses(
        conn,
        filter.watermark.as_deref(),
        filter.category.as_deref(),
    )
    .await
    .map_err(map_db_err)?;
    Ok(cards.into_iter().map(ResponseCard::from).collect())
}

pub async fn find_responses_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_ids: &[i64],
) -> Result<Vec<ResponseCard>, DomainError> {
    let cards = cards_adapter::find_responses_by_ids(conn, card_ids)
        .await
        .map_err(map_db_err)?;
    Ok(cards.into_iter().map(ResponseCard::from).collect())
}

impl From<prompt_cards::Model> for PromptCard {
    fn from(model: prompt_cards::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            pick: model.pick.clamp(1, u8::MAX as i16) as u8,
            watermark: model.watermark,
            category: model.category,
        }
    }
}

impl From<response_cards::Model> for ResponseCard {
    fn from(model: response_cards::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            watermark: model.watermark,
            category: model.category,
        }
    }
}

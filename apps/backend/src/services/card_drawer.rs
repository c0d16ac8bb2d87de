//! Card drawing over a pool view.
//!
//! Pure functions: uniform-random selection without replacement within one
//! draw request, no side effects beyond reading the pool slice. Eligibility
//! filtering (watermark/category) happens when the pool view is queried from
//! the record store; see `repos::cards::CardFilter`.

use rand::seq::index;
use rand::Rng;

use crate::errors::domain::DrawKind;
use crate::errors::DomainError;
use crate::repos::cards::{PromptCard, ResponseCard};

/// Draw one prompt card uniformly from the pool.
pub fn draw_prompt_card<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[PromptCard],
) -> Result<PromptCard, DomainError> {
    if pool.is_empty() {
        return Err(DomainError::draw(
            DrawKind::NoCardsAvailable,
            "prompt card pool is empty",
        ));
    }
    let idx = rng.random_range(0..pool.len());
    Ok(pool[idx].clone())
}

/// Draw `count` distinct response cards uniformly, without replacement.
pub fn draw_response_cards<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[ResponseCard],
    count: usize,
) -> Result<Vec<ResponseCard>, DomainError> {
    if pool.len() < count {
        return Err(DomainError::draw(
            DrawKind::InsufficientCards,
            format!("requested {count} response cards, pool holds {}", pool.len()),
        ));
    }
    let picked = index::sample(rng, pool.len(), count);
    Ok(picked.iter().map(|i| pool[i].clone()).collect())
}

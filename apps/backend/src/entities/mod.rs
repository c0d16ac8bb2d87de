pub mod ai_personalities;
pub mod card_plays;
pub mod game_rounds;
pub mod game_sessions;
pub mod prompt_cards;
pub mod response_cards;
pub mod users;

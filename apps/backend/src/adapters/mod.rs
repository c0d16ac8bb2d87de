//! SeaORM adapters: thin CRUD functions over the entity layer.
//!
//! Adapters speak `Model`s and `sea_orm::DbErr`; the repos layer converts
//! both into domain types.

pub mod cards_sea;
pub mod personalities_sea;
pub mod plays_sea;
pub mod rounds_sea;
pub mod sessions_sea;
pub mod users_sea;

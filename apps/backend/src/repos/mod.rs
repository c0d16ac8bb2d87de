//! Domain repositories: domain models, conversions from entity models, and
//! free functions generic over `ConnectionTrait`.

pub mod cards;
pub mod personalities;
pub mod plays;
pub mod rounds;
pub mod sessions;
pub mod store;
pub mod users;

pub use store::{NewRound, PgRecordStore, PlayPair, RecordStore, RoundResolution};

use crate::errors::DomainError;

/// Map a SeaORM error into the domain storage error.
pub(crate) fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::storage(e.to_string())
}

use std::env;

use crate::error::AppError;

/// Redis URL for the ephemeral session state store.
pub fn redis_url() -> Result<String, AppError> {
    env::var("REDIS_URL")
        .map_err(|_| AppError::config("Required environment variable 'REDIS_URL' is not set"))
}

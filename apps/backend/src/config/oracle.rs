use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the Anthropic judgment oracle client.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// Upper bound on a single oracle call. The per-session lock is held for
    /// at most this long while judging.
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            AppError::config("Required environment variable 'ANTHROPIC_API_KEY' is not set")
        })?;

        let model = env::var("ORACLE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let endpoint = env::var("ORACLE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let timeout_secs = match env::var("ORACLE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config(format!("ORACLE_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            model,
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

//! Error codes for the Quip backend API.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses. Add new codes here; never pass ad-hoc strings as
//! error codes.

use core::fmt;

/// Centralized error codes for the Quip backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Resource not found
    /// User not found
    UserNotFound,
    /// AI personality not found
    PersonalityNotFound,
    /// Game session not found
    SessionNotFound,
    /// Game round not found
    RoundNotFound,
    /// Card not found
    CardNotFound,

    // Request validation
    /// Malformed round submission
    InvalidSubmission,
    /// General validation error
    ValidationError,

    // State-machine misuse
    /// Session was already started
    AlreadyStarted,
    /// Session has not been started yet
    NotStarted,
    /// Round was already resolved
    RoundAlreadyResolved,
    /// Round is still awaiting resolution
    RoundUnresolved,
    /// Session already completed
    SessionCompleted,

    // Admission control
    /// Active-user limit reached
    ServerAtCapacity,

    // Card pool exhaustion
    /// Prompt card pool is empty
    NoCardsAvailable,
    /// Response card pool smaller than the requested draw
    InsufficientCards,

    // Oracle upstream
    /// Judgment oracle unreachable or returned garbage
    OracleUnavailable,
    /// Oracle selection failed validation
    InvalidOracleSelection,
    /// Round judging failed; resubmit the round
    JudgingFailed,

    // Collaborator failures
    /// Record storage failure
    StorageError,
    /// Session state store failure
    StateStoreError,

    // Operational
    /// Configuration error
    ConfigError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::PersonalityNotFound => "PERSONALITY_NOT_FOUND",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::RoundNotFound => "ROUND_NOT_FOUND",
            ErrorCode::CardNotFound => "CARD_NOT_FOUND",
            ErrorCode::InvalidSubmission => "INVALID_SUBMISSION",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::AlreadyStarted => "ALREADY_STARTED",
            ErrorCode::NotStarted => "NOT_STARTED",
            ErrorCode::RoundAlreadyResolved => "ROUND_ALREADY_RESOLVED",
            ErrorCode::RoundUnresolved => "ROUND_UNRESOLVED",
            ErrorCode::SessionCompleted => "SESSION_COMPLETED",
            ErrorCode::ServerAtCapacity => "SERVER_AT_CAPACITY",
            ErrorCode::NoCardsAvailable => "NO_CARDS_AVAILABLE",
            ErrorCode::InsufficientCards => "INSUFFICIENT_CARDS",
            ErrorCode::OracleUnavailable => "ORACLE_UNAVAILABLE",
            ErrorCode::InvalidOracleSelection => "INVALID_ORACLE_SELECTION",
            ErrorCode::JudgingFailed => "JUDGING_FAILED",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::StateStoreError => "STATE_STORE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    fn codes_are_screaming_snake_case() {
        let codes = [
            ErrorCode::UserNotFound,
            ErrorCode::PersonalityNotFound,
            ErrorCode::SessionNotFound,
            ErrorCode::RoundNotFound,
            ErrorCode::CardNotFound,
            ErrorCode::InvalidSubmission,
            ErrorCode::ValidationError,
            ErrorCode::AlreadyStarted,
            ErrorCode::NotStarted,
            ErrorCode::RoundAlreadyResolved,
            ErrorCode::RoundUnresolved,
            ErrorCode::SessionCompleted,
            ErrorCode::ServerAtCapacity,
            ErrorCode::NoCardsAvailable,
            ErrorCode::InsufficientCards,
            ErrorCode::OracleUnavailable,
            ErrorCode::InvalidOracleSelection,
            ErrorCode::JudgingFailed,
            ErrorCode::StorageError,
            ErrorCode::StateStoreError,
            ErrorCode::ConfigError,
            ErrorCode::InternalError,
        ];
        for code in codes {
            let s = code.as_str();
            assert!(!s.is_empty());
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "code '{s}' is not SCREAMING_SNAKE_CASE"
            );
        }
    }

    #[test]
    fn codes_are_unique() {
        use std::collections::HashSet;
        let codes = [
            ErrorCode::UserNotFound.as_str(),
            ErrorCode::PersonalityNotFound.as_str(),
            ErrorCode::SessionNotFound.as_str(),
            ErrorCode::RoundNotFound.as_str(),
            ErrorCode::CardNotFound.as_str(),
            ErrorCode::InvalidSubmission.as_str(),
            ErrorCode::ValidationError.as_str(),
            ErrorCode::AlreadyStarted.as_str(),
            ErrorCode::NotStarted.as_str(),
            ErrorCode::RoundAlreadyResolved.as_str(),
            ErrorCode::RoundUnresolved.as_str(),
            ErrorCode::SessionCompleted.as_str(),
            ErrorCode::ServerAtCapacity.as_str(),
            ErrorCode::NoCardsAvailable.as_str(),
            ErrorCode::InsufficientCards.as_str(),
            ErrorCode::OracleUnavailable.as_str(),
            ErrorCode::InvalidOracleSelection.as_str(),
            ErrorCode::JudgingFailed.as_str(),
            ErrorCode::StorageError.as_str(),
            ErrorCode::StateStoreError.as_str(),
            ErrorCode::ConfigError.as_str(),
            ErrorCode::InternalError.as_str(),
        ];
        let unique: HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}

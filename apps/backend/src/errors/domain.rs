//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Personality,
    Session,
    Round,
    Card,
}

/// Input validation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Round submission violates the prompt card's contract
    InvalidSubmission,
    /// Any other malformed input
    MalformedInput,
}

/// State-machine misuse and admission conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    AlreadyStarted,
    NotStarted,
    RoundAlreadyResolved,
    RoundUnresolved,
    SessionCompleted,
    AtCapacity,
}

/// Card pool exhaustion kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DrawKind {
    /// The prompt card pool is empty
    NoCardsAvailable,
    /// The response pool holds fewer cards than the requested draw
    InsufficientCards,
}

/// Judgment oracle failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OracleKind {
    /// Timeout, transport failure, or unparseable upstream reply
    Unavailable,
    /// The oracle's card selection failed validation
    InvalidSelection,
    /// Round resolution aborted because judging failed; the round stays
    /// unresolved and may be resubmitted
    JudgingFailed,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Semantic conflict with the session/round state machine
    Conflict(ConflictKind, String),
    /// Card pool exhaustion
    Draw(DrawKind, String),
    /// Judgment oracle fault (transient, retryable)
    Oracle(OracleKind, String),
    /// Record storage failure (fatal to the current operation)
    Storage(String),
    /// Ephemeral session state store failure
    StateStore(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::Draw(kind, d) => write!(f, "draw {kind:?}: {d}"),
            DomainError::Oracle(kind, d) => write!(f, "oracle {kind:?}: {d}"),
            DomainError::Storage(d) => write!(f, "storage error: {d}"),
            DomainError::StateStore(d) => write!(f, "state store error: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn draw(kind: DrawKind, detail: impl Into<String>) -> Self {
        Self::Draw(kind, detail.into())
    }
    pub fn oracle(kind: OracleKind, detail: impl Into<String>) -> Self {
        Self::Oracle(kind, detail.into())
    }
    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage(detail.into())
    }
    pub fn state_store(detail: impl Into<String>) -> Self {
        Self::StateStore(detail.into())
    }

    /// True for faults the caller may retry by repeating the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Oracle(_, _))
    }
}

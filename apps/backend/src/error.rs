use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, DrawKind, NotFoundKind, OracleKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Upstream failure: {detail}")]
    Upstream { code: ErrorCode, detail: String },
    #[error("Unavailable: {detail}")]
    Unavailable { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Error code rendered into the response body.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Upstream { code, .. } => *code,
            AppError::Unavailable { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Upstream { detail, .. }
            | AppError::Unavailable { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => {
                        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidSubmission => ErrorCode::InvalidSubmission,
                    ValidationKind::MalformedInput => ErrorCode::ValidationError,
                };
                AppError::Validation { code, detail }
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => ErrorCode::UserNotFound,
                    NotFoundKind::Personality => ErrorCode::PersonalityNotFound,
                    NotFoundKind::Session => ErrorCode::SessionNotFound,
                    NotFoundKind::Round => ErrorCode::RoundNotFound,
                    NotFoundKind::Card => ErrorCode::CardNotFound,
                };
                AppError::NotFound { code, detail }
            }
            DomainError::Conflict(kind, detail) => match kind {
                ConflictKind::AtCapacity => AppError::Unavailable {
                    code: ErrorCode::ServerAtCapacity,
                    detail,
                },
                ConflictKind::AlreadyStarted => AppError::Conflict {
                    code: ErrorCode::AlreadyStarted,
                    detail,
                },
                ConflictKind::NotStarted => AppError::Conflict {
                    code: ErrorCode::NotStarted,
                    detail,
                },
                ConflictKind::RoundAlreadyResolved => AppError::Conflict {
                    code: ErrorCode::RoundAlreadyResolved,
                    detail,
                },
                ConflictKind::RoundUnresolved => AppError::Conflict {
                    code: ErrorCode::RoundUnresolved,
                    detail,
                },
                ConflictKind::SessionCompleted => AppError::Conflict {
                    code: ErrorCode::SessionCompleted,
                    detail,
                },
            },
            DomainError::Draw(kind, detail) => {
                let code = match kind {
                    DrawKind::NoCardsAvailable => ErrorCode::NoCardsAvailable,
                    DrawKind::InsufficientCards => ErrorCode::InsufficientCards,
                };
                AppError::Unavailable { code, detail }
            }
            DomainError::Oracle(kind, detail) => match kind {
                OracleKind::InvalidSelection => AppError::Upstream {
                    code: ErrorCode::InvalidOracleSelection,
                    detail,
                },
                OracleKind::JudgingFailed => AppError::Unavailable {
                    code: ErrorCode::JudgingFailed,
                    detail,
                },
                OracleKind::Unavailable => AppError::Unavailable {
                    code: ErrorCode::OracleUnavailable,
                    detail,
                },
            },
            DomainError::Storage(detail) => AppError::Internal {
                code: ErrorCode::StorageError,
                detail,
            },
            DomainError::StateStore(detail) => AppError::Internal {
                code: ErrorCode::StateStoreError,
                detail,
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::Internal {
            code: ErrorCode::StorageError,
            detail: format!("db error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://quip.app/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::DrawKind;

    #[test]
    fn domain_not_found_maps_to_404_with_entity_code() {
        let err: AppError =
            DomainError::not_found(NotFoundKind::Session, "session 7 not found").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[test]
    fn invalid_submission_maps_to_400() {
        let err: AppError =
            DomainError::validation(ValidationKind::InvalidSubmission, "wrong pick count").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::InvalidSubmission);
    }

    #[test]
    fn state_machine_misuse_maps_to_409() {
        let err: AppError =
            DomainError::conflict(ConflictKind::RoundAlreadyResolved, "round 3").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), ErrorCode::RoundAlreadyResolved);

        let err: AppError = DomainError::conflict(ConflictKind::AlreadyStarted, "session 1").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), ErrorCode::AlreadyStarted);
    }

    #[test]
    fn capacity_and_oracle_failures_map_to_503() {
        let err: AppError = DomainError::conflict(ConflictKind::AtCapacity, "100 active").into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), ErrorCode::ServerAtCapacity);

        let err: AppError = DomainError::oracle(OracleKind::JudgingFailed, "timeout").into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), ErrorCode::JudgingFailed);
    }

    #[test]
    fn invalid_oracle_selection_maps_to_502() {
        let err: AppError = DomainError::oracle(OracleKind::InvalidSelection, "6 of 5").into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), ErrorCode::InvalidOracleSelection);
    }

    #[test]
    fn draw_exhaustion_maps_to_503() {
        let err: AppError = DomainError::draw(DrawKind::InsufficientCards, "8 < 10").into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), ErrorCode::InsufficientCards);
    }

    #[test]
    fn humanize_code_title() {
        assert_eq!(
            AppError::humanize_code("ROUND_ALREADY_RESOLVED"),
            "Round Already Resolved"
        );
    }
}

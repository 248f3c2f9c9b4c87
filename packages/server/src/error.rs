use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::EngineError;
use common::validation::{FieldError, ValidationReport};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `STATE_CONFLICT`, `DUPLICATE_ASSIGNMENT`, `INSUFFICIENT_QUALIFIERS`,
    /// `DATE_OUT_OF_WINDOW`, `CONFIGURATION_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "round2_quantity must be divisible by number_of_tables_round2")]
    pub message: String,
    /// Per-field failures, present only for `VALIDATION_ERROR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Field-tagged rule violations; the caller re-prompts per field.
    Validation(Vec<FieldError>),
    NotFound(String),
    StateConflict(String),
    DuplicateAssignment(String),
    InsufficientQualifiers {
        required: u32,
        submitted: u32,
    },
    DateOutOfWindow(String),
    /// An invariant was violated below the layer meant to enforce it.
    Configuration(String),
    Internal(String),
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message, fields) = match self {
            AppError::Validation(fields) => {
                let message = fields
                    .iter()
                    .map(|f| f.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    message,
                    Some(fields),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::StateConflict(msg) => (StatusCode::CONFLICT, "STATE_CONFLICT", msg, None),
            AppError::DuplicateAssignment(msg) => {
                (StatusCode::CONFLICT, "DUPLICATE_ASSIGNMENT", msg, None)
            }
            AppError::InsufficientQualifiers {
                required,
                submitted,
            } => (
                StatusCode::CONFLICT,
                "INSUFFICIENT_QUALIFIERS",
                format!(
                    "Round 2 needs {required} qualifiers with submitted originals, found {submitted}"
                ),
                None,
            ),
            AppError::DateOutOfWindow(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DATE_OUT_OF_WINDOW",
                msg,
                None,
            ),
            AppError::Configuration(detail) => {
                tracing::error!("Configuration error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    detail,
                    None,
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                    None,
                )
            }
        };

        (
            status,
            ErrorBody {
                code,
                message,
                fields,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ValidationReport> for AppError {
    fn from(report: ValidationReport) -> Self {
        AppError::Validation(report.errors)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(report) => report.into(),
            EngineError::Configuration(msg) => AppError::Configuration(msg),
            EngineError::InsufficientQualifiers {
                required,
                submitted,
            } => AppError::InsufficientQualifiers {
                required,
                submitted,
            },
            e @ EngineError::DateOutOfWindow { .. } => AppError::DateOutOfWindow(e.to_string()),
            EngineError::StateConflict(msg) => AppError::StateConflict(msg),
        }
    }
}

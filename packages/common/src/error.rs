use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::validation::ValidationReport;
use crate::window::DateWindow;

/// Failures raised by the pure engine layer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// One or more field-tagged rule violations.
    #[error("validation failed on {} field(s)", .0.errors.len())]
    Validation(ValidationReport),

    /// An invariant that an earlier layer should have guaranteed does not hold.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("insufficient qualifiers: {submitted} of {required} have submitted originals")]
    InsufficientQualifiers { required: u32, submitted: u32 },

    #[error("date {date} is outside the allowed window {window}")]
    DateOutOfWindow {
        date: DateTime<Utc>,
        window: DateWindow,
    },

    #[error("{0}")]
    StateConflict(String),
}

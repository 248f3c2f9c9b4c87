//! Round lifecycle of a contest: the derived phase and the guards each
//! mutating operation checks before touching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contest_status::ContestStatus;
use crate::error::EngineError;
use crate::qualification::QualificationSummary;

/// Where a contest stands in its round progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    NoRounds,
    #[serde(rename = "ROUND_1_ACTIVE")]
    Round1Active,
    #[serde(rename = "ROUND_1_CLOSED")]
    Round1Closed,
    #[serde(rename = "ROUND_2_ACTIVE")]
    Round2Active,
    Complete,
}

/// The parts of a persisted round the phase depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundTimeline {
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundProgress {
    pub round1: Option<RoundTimeline>,
    pub round2: Option<RoundTimeline>,
}

impl RoundPhase {
    pub fn derive(status: ContestStatus, progress: RoundProgress, now: DateTime<Utc>) -> Self {
        if status == ContestStatus::Completed {
            return Self::Complete;
        }
        if let Some(round2) = progress.round2 {
            return match round2.end_date {
                Some(end) if now > end => Self::Complete,
                _ => Self::Round2Active,
            };
        }
        match progress.round1 {
            None => Self::NoRounds,
            Some(RoundTimeline { end_date: Some(end) }) if now > end => Self::Round1Closed,
            Some(_) => Self::Round1Active,
        }
    }
}

fn conflict(msg: impl Into<String>) -> EngineError {
    EngineError::StateConflict(msg.into())
}

/// Completed and cancelled contests accept no further changes.
pub fn ensure_mutable(status: ContestStatus) -> Result<(), EngineError> {
    if status.is_terminal() {
        return Err(conflict(format!("Contest is {status} and can no longer change")));
    }
    Ok(())
}

pub fn ensure_can_create_round1(status: ContestStatus, has_round1: bool) -> Result<(), EngineError> {
    if !matches!(status, ContestStatus::Draft | ContestStatus::Active) {
        return Err(conflict(format!(
            "Round 1 can only be created on a DRAFT or ACTIVE contest (contest is {status})"
        )));
    }
    if has_round1 {
        return Err(conflict("Round 1 already exists"));
    }
    Ok(())
}

/// Round 2 needs Round 1, no existing Round 2, and enough confirmed originals.
pub fn ensure_can_create_round2(
    status: ContestStatus,
    has_round1: bool,
    has_round2: bool,
    round2_quantity: i32,
    summary: &QualificationSummary,
) -> Result<(), EngineError> {
    ensure_mutable(status)?;
    if !has_round1 {
        return Err(conflict("Round 1 must exist before Round 2 is created"));
    }
    if has_round2 {
        return Err(conflict("Round 2 already exists"));
    }
    if round2_quantity <= 0 {
        return Err(conflict("Round 2 is disabled for this contest"));
    }
    let required = round2_quantity as u32;
    if summary.submitted < required {
        return Err(EngineError::InsufficientQualifiers {
            required,
            submitted: summary.submitted,
        });
    }
    Ok(())
}

pub fn ensure_can_delete_round(status: ContestStatus) -> Result<(), EngineError> {
    if status != ContestStatus::Draft {
        return Err(conflict(format!(
            "Rounds can only be deleted while the contest is DRAFT (contest is {status})"
        )));
    }
    Ok(())
}

pub fn ensure_can_publish(status: ContestStatus, has_round1: bool) -> Result<(), EngineError> {
    if status != ContestStatus::Draft {
        return Err(conflict(format!(
            "Only DRAFT contests can be published (contest is {status})"
        )));
    }
    if !has_round1 {
        return Err(conflict("Round 1 must exist before publishing"));
    }
    Ok(())
}

/// Original submission status is frozen once Round 2 has been created.
pub fn ensure_qualification_open(status: ContestStatus, has_round2: bool) -> Result<(), EngineError> {
    ensure_mutable(status)?;
    if has_round2 {
        return Err(conflict(
            "Original submission status is locked once Round 2 exists",
        ));
    }
    Ok(())
}

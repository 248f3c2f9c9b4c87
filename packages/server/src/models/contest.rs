use chrono::{DateTime, Utc};
use common::ContestStatus;
use common::lifecycle::RoundPhase;
use common::validation::{
    ContestConfig, FieldError, RoundDates, ValidationReport, validate_contest_config,
};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_title};
use crate::error::AppError;

/// Request body for creating a contest. New contests start as `DRAFT`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestRequest {
    #[schema(example = "Spring Salon 2030")]
    pub title: String,
    pub description: String,
    #[schema(example = "2030-03-01T00:00:00Z")]
    pub start_date: DateTime<Utc>,
    #[schema(example = "2030-06-30T00:00:00Z")]
    pub end_date: DateTime<Utc>,
    /// Competitors advancing to Round 2; 0 disables Round 2.
    #[schema(example = 12)]
    pub round2_quantity: i32,
    #[schema(example = 4)]
    pub number_of_tables_round2: i32,
    /// Defaults to the server's `engine.schedule_enforced_by_default`.
    pub is_schedule_enforced: Option<bool>,
}

impl CreateContestRequest {
    pub fn config(&self) -> ContestConfig {
        ContestConfig {
            start_date: self.start_date,
            end_date: self.end_date,
            round2_quantity: self.round2_quantity,
            number_of_tables_round2: self.number_of_tables_round2,
            round1: None,
        }
    }
}

/// PATCH body for a contest. Absent fields are left unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateContestRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub round2_quantity: Option<i32>,
    pub number_of_tables_round2: Option<i32>,
}

impl UpdateContestRequest {
    pub fn changes_round2_sizing(&self) -> bool {
        self.round2_quantity.is_some() || self.number_of_tables_round2.is_some()
    }
}

/// The external terminal transition.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateContestStatusRequest {
    /// `COMPLETED` or `CANCELLED`.
    pub status: ContestStatus,
}

/// A drafted contest + Round 1 configuration to check without saving.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ValidateContestRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub round2_quantity: i32,
    pub number_of_tables_round2: i32,
    pub round1: Option<RoundDates>,
}

impl From<ValidateContestRequest> for ContestConfig {
    fn from(req: ValidateContestRequest) -> Self {
        ContestConfig {
            start_date: req.start_date,
            end_date: req.end_date,
            round2_quantity: req.round2_quantity,
            number_of_tables_round2: req.number_of_tables_round2,
            round1: req.round1,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationResultResponse {
    pub ok: bool,
    pub errors: Vec<FieldError>,
}

impl From<ValidationReport> for ValidationResultResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            ok: report.is_ok(),
            errors: report.errors,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ContestListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Filter by status.
    pub status: Option<ContestStatus>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub round2_quantity: i32,
    pub number_of_tables_round2: i32,
    pub status: ContestStatus,
    pub is_schedule_enforced: bool,
    /// Derived from the contest's rounds and the current time.
    pub phase: RoundPhase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContestResponse {
    pub fn new(m: crate::entity::contest::Model, phase: RoundPhase) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            start_date: m.start_date,
            end_date: m.end_date,
            round2_quantity: m.round2_quantity,
            number_of_tables_round2: m.number_of_tables_round2,
            status: m.status,
            is_schedule_enforced: m.is_schedule_enforced,
            phase,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListItem {
    pub id: i32,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ContestStatus,
}

impl From<crate::entity::contest::Model> for ContestListItem {
    fn from(m: crate::entity::contest::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            start_date: m.start_date,
            end_date: m.end_date,
            status: m.status,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListResponse {
    pub data: Vec<ContestListItem>,
    pub pagination: Pagination,
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.len() > 1_000_000 {
        return Err(AppError::invalid(
            "description",
            "description must be at most 1MB",
        ));
    }
    Ok(())
}

/// Records a field-level check into `report` so it accumulates with the
/// configuration rules.
fn record(report: &mut ValidationReport, result: Result<(), AppError>) {
    if let Err(AppError::Validation(errors)) = result {
        report.merge(ValidationReport { errors });
    }
}

/// Text rules and the shared configuration rules, in one report.
pub fn validate_create_contest(req: &CreateContestRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    record(&mut report, validate_title(&req.title));
    record(&mut report, validate_description(&req.description));
    report.merge(validate_contest_config(&req.config()));
    report
}

/// Text rules of a partial edit. The service adds the configuration rules
/// once the edit is merged with the stored contest.
pub fn validate_update_contest(req: &UpdateContestRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    if let Some(ref title) = req.title {
        record(&mut report, validate_title(title));
    }
    if let Some(ref description) = req.description {
        record(&mut report, validate_description(description));
    }
    report
}

/// Status requests may only carry one of the externally set terminal states.
pub fn validate_status_request(req: &UpdateContestStatusRequest) -> Result<(), AppError> {
    if !req.status.is_terminal() {
        return Err(AppError::invalid(
            "status",
            "status must be COMPLETED or CANCELLED; use publish to activate a contest",
        ));
    }
    Ok(())
}

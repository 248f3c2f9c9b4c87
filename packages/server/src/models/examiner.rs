use chrono::{DateTime, Utc};
use common::{ExaminerRole, ScheduleStatus};
use serde::{Deserialize, Serialize};

use super::shared::{validate_name, validate_text};
use crate::entity::{examiner, examiner_assignment, schedule};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateExaminerRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Oil painting")]
    pub specialization: String,
}

pub fn validate_create_examiner(req: &CreateExaminerRequest) -> Result<(), AppError> {
    validate_name("name", &req.name)?;
    validate_text("specialization", &req.specialization, 128)
}

/// Assigns an examiner to one round of a contest.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignExaminerRequest {
    pub examiner_id: i32,
    pub role: ExaminerRole,
    /// Round 2 only. Defaults to table 1.
    pub table_number: Option<i32>,
}

pub fn validate_assign_examiner(
    req: &AssignExaminerRequest,
    number_of_tables_round2: i32,
) -> Result<(), AppError> {
    match (req.role, req.table_number) {
        (ExaminerRole::Round1, Some(_)) => Err(AppError::invalid(
            "table_number",
            "table_number only applies to ROUND_2 examiners",
        )),
        (ExaminerRole::Round2, Some(n)) if n < 1 || n > number_of_tables_round2 => {
            Err(AppError::invalid(
                "table_number",
                format!("table_number must be between 1 and {number_of_tables_round2}"),
            ))
        }
        _ => Ok(()),
    }
}

/// Sets (or moves) an examiner's single visit date for a contest.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetScheduleRequest {
    #[schema(example = "2030-03-20T10:00:00Z")]
    pub date: DateTime<Utc>,
    /// Defaults to `engine.default_schedule_task`.
    pub task: Option<String>,
}

pub fn validate_set_schedule(req: &SetScheduleRequest) -> Result<(), AppError> {
    if let Some(ref task) = req.task {
        validate_text("task", task, 256)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExaminerResponse {
    pub id: i32,
    pub name: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl From<examiner::Model> for ExaminerResponse {
    fn from(m: examiner::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            specialization: m.specialization,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignmentResponse {
    pub id: i32,
    pub contest_id: i32,
    pub examiner_id: i32,
    pub role: ExaminerRole,
    pub table_number: Option<i32>,
    pub assigned_at: DateTime<Utc>,
}

impl From<examiner_assignment::Model> for AssignmentResponse {
    fn from(m: examiner_assignment::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            examiner_id: m.examiner_id,
            role: m.role,
            table_number: m.table_number,
            assigned_at: m.assigned_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScheduleResponse {
    pub id: i32,
    pub contest_id: i32,
    pub examiner_id: i32,
    pub task: String,
    pub date: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<schedule::Model> for ScheduleResponse {
    fn from(m: schedule::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            examiner_id: m.examiner_id,
            task: m.task,
            date: m.date,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EnforcementResponse {
    pub contest_id: i32,
    pub is_schedule_enforced: bool,
}

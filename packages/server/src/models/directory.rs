use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_name, validate_title};
use crate::entity::{evaluation, painting};
use crate::error::AppError;

/// Registers a competitor's painting in a contest. The competitor is created
/// on first use of the name.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterPaintingRequest {
    #[schema(example = "Ada Lovelace")]
    pub competitor_name: String,
    #[schema(example = "Harbour at Dusk")]
    pub title: String,
    /// Defaults to now. Earlier submissions win ties on equal averages.
    pub submitted_at: Option<DateTime<Utc>>,
}

pub fn validate_register_painting(req: &RegisterPaintingRequest) -> Result<(), AppError> {
    validate_name("competitor_name", &req.competitor_name)?;
    validate_title(&req.title)
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitEvaluationRequest {
    pub painting_id: i32,
    pub examiner_id: i32,
    #[schema(minimum = 0, maximum = 100, example = 88)]
    pub score: i32,
}

pub fn validate_evaluation(req: &SubmitEvaluationRequest) -> Result<(), AppError> {
    if !(0..=100).contains(&req.score) {
        return Err(AppError::invalid("score", "score must be between 0 and 100"));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PaintingResponse {
    pub id: i32,
    pub contest_id: i32,
    pub competitor_id: i32,
    pub title: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<painting::Model> for PaintingResponse {
    fn from(m: painting::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            competitor_id: m.competitor_id,
            title: m.title,
            submitted_at: m.submitted_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EvaluationResponse {
    pub id: i32,
    pub round_id: i32,
    pub painting_id: i32,
    pub examiner_id: i32,
    pub score: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<evaluation::Model> for EvaluationResponse {
    fn from(m: evaluation::Model) -> Self {
        Self {
            id: m.id,
            round_id: m.round_id,
            painting_id: m.painting_id,
            examiner_id: m.examiner_id,
            score: m.score,
            updated_at: m.updated_at,
        }
    }
}

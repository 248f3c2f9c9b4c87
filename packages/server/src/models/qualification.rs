use chrono::{DateTime, Utc};
use common::OriginalSubmissionStatus;
use common::qualification::{QualificationSummary, QualifiedEntry};
use serde::{Deserialize, Serialize};

use crate::entity::original_submission;

/// Staff confirmation that a qualifier handed in the physical original.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetOriginalStatusRequest {
    pub has_submitted_original: bool,
}

/// The current Round 1 qualifiers of a contest.
#[derive(Serialize, utoipa::ToSchema)]
pub struct QualifiedListResponse {
    pub contest_id: i32,
    /// Number of competitors that advance (`round2_quantity`).
    pub quota: u32,
    /// True when fewer competitors were scored than the quota.
    pub under_quota: bool,
    pub summary: QualificationSummary,
    pub qualified: Vec<QualifiedEntry>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OriginalStatusResponse {
    pub contest_id: i32,
    pub painting_id: i32,
    pub status: OriginalSubmissionStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<original_submission::Model> for OriginalStatusResponse {
    fn from(m: original_submission::Model) -> Self {
        Self {
            contest_id: m.contest_id,
            painting_id: m.painting_id,
            status: m.status,
            updated_at: m.updated_at,
        }
    }
}

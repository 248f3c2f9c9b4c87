#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreSummary;

/// Whether a qualifier has handed in the physical original of their painting.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginalSubmissionStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "NOT_SUBMITTED_ORIGINAL"))]
    NotSubmittedOriginal,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ORIGINAL_SUBMITTED"))]
    OriginalSubmitted,
}

impl OriginalSubmissionStatus {
    pub fn from_flag(has_submitted_original: bool) -> Self {
        if has_submitted_original {
            Self::OriginalSubmitted
        } else {
            Self::NotSubmittedOriginal
        }
    }
}

/// A Round 1 score joined with the painting's submission time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub score: ScoreSummary,
    pub submitted_at: DateTime<Utc>,
}

/// A competitor selected for Round 2.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QualifiedEntry {
    /// 1-based qualification rank.
    #[schema(example = 1)]
    pub rank: u32,
    pub competitor_id: i32,
    pub painting_id: i32,
    #[schema(example = 91.25)]
    pub avg_score: f64,
    pub evaluation_count: u32,
    pub submitted_at: DateTime<Utc>,
    pub original_submission_status: OriginalSubmissionStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QualificationSummary {
    pub total_qualified: u32,
    pub submitted: u32,
    pub not_submitted: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Qualification {
    pub qualified: Vec<QualifiedEntry>,
    pub summary: QualificationSummary,
    /// The configured quota (`round2_quantity`).
    pub quota: u32,
    /// Fewer candidates than the quota were available.
    pub under_quota: bool,
}

impl Qualification {
    /// Competitor ids in rank order.
    pub fn ranked_competitors(&self) -> Vec<i32> {
        self.qualified.iter().map(|q| q.competitor_id).collect()
    }
}

/// Rank order: higher average first, then earlier submission, then painting id.
fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .avg_score
        .total_cmp(&a.score.avg_score)
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        .then_with(|| a.score.painting_id.cmp(&b.score.painting_id))
}

/// Picks the top `quota` candidates.
///
/// `statuses` maps painting ids to the staff-recorded original submission
/// status; paintings missing from it count as not submitted.
pub fn select_qualifiers(
    mut candidates: Vec<Candidate>,
    quota: u32,
    statuses: &HashMap<i32, OriginalSubmissionStatus>,
) -> Qualification {
    candidates.sort_by(rank_order);
    let under_quota = candidates.len() < quota as usize;
    candidates.truncate(quota as usize);

    let mut summary = QualificationSummary::default();
    let qualified: Vec<QualifiedEntry> = candidates
        .into_iter()
        .zip(1u32..)
        .map(|(c, rank)| {
            let status = statuses
                .get(&c.score.painting_id)
                .copied()
                .unwrap_or_default();
            match status {
                OriginalSubmissionStatus::OriginalSubmitted => summary.submitted += 1,
                OriginalSubmissionStatus::NotSubmittedOriginal => summary.not_submitted += 1,
            }
            QualifiedEntry {
                rank,
                competitor_id: c.score.competitor_id,
                painting_id: c.score.painting_id,
                avg_score: c.score.avg_score,
                evaluation_count: c.score.evaluation_count,
                submitted_at: c.submitted_at,
                original_submission_status: status,
            }
        })
        .collect();
    summary.total_qualified = qualified.len() as u32;

    Qualification {
        qualified,
        summary,
        quota,
        under_quota,
    }
}

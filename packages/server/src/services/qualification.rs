use std::collections::HashMap;

use chrono::Utc;
use common::OriginalSubmissionStatus;
use common::lifecycle::ensure_qualification_open;
use common::qualification::{Candidate, Qualification, select_qualifiers};
use common::scoring::{self, ScoreSummary};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entity::{contest, evaluation, original_submission, painting, round};
use crate::error::AppError;
use crate::utils::contest::{find_contest_for_update, load_rounds};

/// Reads Round 1 results and the staff-recorded original submissions.
pub struct QualificationService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> QualificationService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn paintings(&self, contest_id: i32) -> Result<HashMap<i32, painting::Model>, AppError> {
        Ok(painting::Entity::find()
            .filter(painting::Column::ContestId.eq(contest_id))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// Aggregated scores of one round. Evaluations of paintings outside the
    /// contest are ignored.
    async fn summaries(
        &self,
        r: &round::Model,
        paintings: &HashMap<i32, painting::Model>,
    ) -> Result<Vec<ScoreSummary>, AppError> {
        let evaluations: Vec<scoring::Evaluation> = evaluation::Entity::find()
            .filter(evaluation::Column::RoundId.eq(r.id))
            .all(self.conn)
            .await?
            .into_iter()
            .filter_map(|e| {
                paintings.get(&e.painting_id).map(|p| scoring::Evaluation {
                    competitor_id: p.competitor_id,
                    painting_id: p.id,
                    score: e.score,
                })
            })
            .collect();
        Ok(scoring::aggregate(&evaluations).into_values().collect())
    }

    /// Round scores, best average first.
    pub async fn round_scores(
        &self,
        contest_id: i32,
        r: &round::Model,
    ) -> Result<Vec<ScoreSummary>, AppError> {
        let paintings = self.paintings(contest_id).await?;
        let mut scores = self.summaries(r, &paintings).await?;
        scores.sort_by(|a, b| {
            b.avg_score
                .total_cmp(&a.avg_score)
                .then_with(|| a.painting_id.cmp(&b.painting_id))
        });
        Ok(scores)
    }

    pub async fn statuses(
        &self,
        contest_id: i32,
    ) -> Result<HashMap<i32, OriginalSubmissionStatus>, AppError> {
        Ok(original_submission::Entity::find()
            .filter(original_submission::Column::ContestId.eq(contest_id))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|s| (s.painting_id, s.status))
            .collect())
    }

    /// The top `round2_quantity` competitors of Round 1.
    pub async fn qualify(
        &self,
        contest: &contest::Model,
        round1: &round::Model,
    ) -> Result<Qualification, AppError> {
        let paintings = self.paintings(contest.id).await?;
        let candidates = self
            .summaries(round1, &paintings)
            .await?
            .into_iter()
            .filter_map(|score| {
                paintings.get(&score.painting_id).map(|p| Candidate {
                    score,
                    submitted_at: p.submitted_at,
                })
            })
            .collect();
        let statuses = self.statuses(contest.id).await?;
        let quota = contest.round2_quantity.max(0) as u32;
        Ok(select_qualifiers(candidates, quota, &statuses))
    }
}

impl QualificationService<'_, DatabaseConnection> {
    /// Records whether a qualifier has handed in their original.
    ///
    /// Only current qualifiers can be marked, and only before Round 2 exists.
    pub async fn set_original_status(
        &self,
        contest_id: i32,
        painting_id: i32,
        has_submitted_original: bool,
    ) -> Result<original_submission::Model, AppError> {
        let txn = self.conn.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        let rounds = load_rounds(&txn, contest_id).await?;
        ensure_qualification_open(contest.status, rounds.round2.is_some())?;

        let round1 = rounds
            .round1
            .as_ref()
            .ok_or_else(|| AppError::StateConflict("Round 1 does not exist yet".into()))?;
        let qualification = QualificationService::new(&txn)
            .qualify(&contest, round1)
            .await?;
        if !qualification
            .qualified
            .iter()
            .any(|q| q.painting_id == painting_id)
        {
            return Err(AppError::NotFound(
                "Painting is not among the current qualifiers".into(),
            ));
        }

        let status = OriginalSubmissionStatus::from_flag(has_submitted_original);
        let model = original_submission::ActiveModel {
            contest_id: Set(contest_id),
            painting_id: Set(painting_id),
            status: Set(status),
            updated_at: Set(Utc::now()),
        };
        original_submission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    original_submission::Column::ContestId,
                    original_submission::Column::PaintingId,
                ])
                .update_columns([
                    original_submission::Column::Status,
                    original_submission::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let saved = original_submission::Entity::find_by_id((contest_id, painting_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Internal("original_submission missing after upsert".into()))?;
        txn.commit().await?;

        info!(contest_id, painting_id, status = ?saved.status, "Original submission recorded");
        Ok(saved)
    }
}

use chrono::Utc;
use common::RoundName;
use common::lifecycle::ensure_mutable;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use crate::entity::{competitor, evaluation, examiner, judging_table, painting, round, table_seat};
use crate::error::AppError;
use crate::models::directory::{RegisterPaintingRequest, SubmitEvaluationRequest};
use crate::utils::contest::{find_contest_for_update, is_unique_violation};

/// The competitor/painting directory and the evaluation feed.
pub struct DirectoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DirectoryService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn register_painting(
        &self,
        contest_id: i32,
        req: RegisterPaintingRequest,
    ) -> Result<painting::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        let competitor = find_or_create_competitor(&txn, req.competitor_name.trim()).await?;
        let model = painting::ActiveModel {
            contest_id: Set(contest_id),
            competitor_id: Set(competitor.id),
            title: Set(req.title.trim().to_string()),
            submitted_at: Set(req.submitted_at.unwrap_or_else(Utc::now)),
            ..Default::default()
        };
        let inserted = match model.insert(&txn).await {
            Ok(inserted) => inserted,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::StateConflict(
                    "Competitor already has a painting in this contest".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(
            contest_id,
            painting_id = inserted.id,
            competitor_id = competitor.id,
            "Painting registered"
        );
        Ok(inserted)
    }

    /// Records an examiner's score. Rescoring the same painting in the same
    /// round replaces the earlier score.
    pub async fn submit_evaluation(
        &self,
        contest_id: i32,
        round_id: i32,
        req: &SubmitEvaluationRequest,
    ) -> Result<evaluation::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        let target = round::Entity::find_by_id(round_id)
            .filter(round::Column::ContestId.eq(contest_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Round not found".into()))?;
        painting::Entity::find_by_id(req.painting_id)
            .filter(painting::Column::ContestId.eq(contest_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Painting not found".into()))?;
        examiner::Entity::find_by_id(req.examiner_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Examiner not found".into()))?;

        if target.name == RoundName::Round2 && !is_seated(&txn, round_id, req.painting_id).await? {
            return Err(AppError::StateConflict(
                "Painting is not seated at any Round 2 table".into(),
            ));
        }

        let now = Utc::now();
        let model = evaluation::ActiveModel {
            round_id: Set(round_id),
            painting_id: Set(req.painting_id),
            examiner_id: Set(req.examiner_id),
            score: Set(req.score),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        evaluation::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    evaluation::Column::RoundId,
                    evaluation::Column::PaintingId,
                    evaluation::Column::ExaminerId,
                ])
                .update_columns([evaluation::Column::Score, evaluation::Column::UpdatedAt])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let saved = evaluation::Entity::find()
            .filter(evaluation::Column::RoundId.eq(round_id))
            .filter(evaluation::Column::PaintingId.eq(req.painting_id))
            .filter(evaluation::Column::ExaminerId.eq(req.examiner_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Internal("evaluation missing after upsert".into()))?;
        txn.commit().await?;

        info!(
            contest_id,
            round_id,
            painting_id = req.painting_id,
            examiner_id = req.examiner_id,
            score = req.score,
            "Evaluation recorded"
        );
        Ok(saved)
    }
}

async fn find_or_create_competitor<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<competitor::Model, AppError> {
    let model = competitor::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    competitor::Entity::insert(model)
        .on_conflict(
            OnConflict::column(competitor::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    competitor::Entity::find()
        .filter(competitor::Column::Name.eq(name))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Internal("competitor missing after upsert".into()))
}

async fn is_seated<C: ConnectionTrait>(
    conn: &C,
    round_id: i32,
    painting_id: i32,
) -> Result<bool, AppError> {
    let table_ids: Vec<i32> = judging_table::Entity::find()
        .filter(judging_table::Column::RoundId.eq(round_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    let seated = table_seat::Entity::find()
        .filter(table_seat::Column::TableId.is_in(table_ids))
        .filter(table_seat::Column::PaintingId.eq(painting_id))
        .count(conn)
        .await?;
    Ok(seated > 0)
}

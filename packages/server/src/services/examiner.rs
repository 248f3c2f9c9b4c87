use chrono::{DateTime, Utc};
use common::examiner::check_schedule_date;
use common::lifecycle::ensure_mutable;
use common::{DateWindow, ExaminerRole, ScheduleStatus};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use crate::entity::{contest, examiner, examiner_assignment, judging_table, schedule};
use crate::error::AppError;
use crate::models::examiner::{AssignExaminerRequest, validate_assign_examiner};
use crate::utils::contest::{
    ContestRounds, find_contest_for_update, is_unique_violation, load_rounds, round_window,
    table_window,
};

/// Examiner assignments and visit schedules for one contest at a time.
pub struct ExaminerService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ExaminerService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn assign(
        &self,
        contest_id: i32,
        req: &AssignExaminerRequest,
    ) -> Result<examiner_assignment::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        examiner::Entity::find_by_id(req.examiner_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Examiner not found".into()))?;

        if req.role == ExaminerRole::Round2 && contest.round2_quantity == 0 {
            return Err(AppError::StateConflict(
                "Round 2 is disabled for this contest".into(),
            ));
        }
        validate_assign_examiner(req, contest.number_of_tables_round2)?;

        let model = examiner_assignment::ActiveModel {
            contest_id: Set(contest_id),
            examiner_id: Set(req.examiner_id),
            role: Set(req.role),
            table_number: Set(req.table_number),
            assigned_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = match model.insert(&txn).await {
            Ok(inserted) => inserted,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::DuplicateAssignment(format!(
                    "Examiner {} is already assigned to {} in this contest",
                    req.examiner_id, req.role
                )));
            }
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(
            contest_id,
            examiner_id = req.examiner_id,
            role = %req.role,
            "Examiner assigned"
        );
        Ok(inserted)
    }

    /// Removes every assignment and the schedule of an examiner in a contest.
    pub async fn remove(&self, contest_id: i32, examiner_id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        let removed = examiner_assignment::Entity::delete_many()
            .filter(examiner_assignment::Column::ContestId.eq(contest_id))
            .filter(examiner_assignment::Column::ExaminerId.eq(examiner_id))
            .exec(&txn)
            .await?;
        if removed.rows_affected == 0 {
            return Err(AppError::NotFound(
                "Examiner is not assigned to this contest".into(),
            ));
        }
        schedule::Entity::delete_many()
            .filter(schedule::Column::ContestId.eq(contest_id))
            .filter(schedule::Column::ExaminerId.eq(examiner_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(contest_id, examiner_id, "Examiner removed");
        Ok(())
    }

    /// Creates the examiner's schedule or moves it to a new date.
    ///
    /// With enforcement on, `date` must fall inside the window of one of the
    /// examiner's roles.
    pub async fn set_schedule(
        &self,
        contest_id: i32,
        examiner_id: i32,
        date: DateTime<Utc>,
        task: String,
    ) -> Result<schedule::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        let assignments = examiner_assignment::Entity::find()
            .filter(examiner_assignment::Column::ContestId.eq(contest_id))
            .filter(examiner_assignment::Column::ExaminerId.eq(examiner_id))
            .all(&txn)
            .await?;
        if assignments.is_empty() {
            return Err(AppError::NotFound(
                "Examiner is not assigned to this contest".into(),
            ));
        }

        let rounds = load_rounds(&txn, contest_id).await?;
        let windows = role_windows(&txn, &contest, &rounds, &assignments).await?;
        check_schedule_date(contest.is_schedule_enforced, date, &windows)?;

        let now = Utc::now();
        let model = schedule::ActiveModel {
            contest_id: Set(contest_id),
            examiner_id: Set(examiner_id),
            task: Set(task),
            date: Set(date),
            status: Set(ScheduleStatus::Scheduled),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        schedule::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([schedule::Column::ContestId, schedule::Column::ExaminerId])
                    .update_columns([
                        schedule::Column::Task,
                        schedule::Column::Date,
                        schedule::Column::Status,
                        schedule::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let saved = schedule::Entity::find()
            .filter(schedule::Column::ContestId.eq(contest_id))
            .filter(schedule::Column::ExaminerId.eq(examiner_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Internal("schedule missing after upsert".into()))?;
        txn.commit().await?;

        info!(contest_id, examiner_id, date = %saved.date, "Schedule set");
        Ok(saved)
    }

    /// Flips `is_schedule_enforced`. Existing schedules are not re-checked.
    pub async fn toggle_enforcement(&self, contest_id: i32) -> Result<contest::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(contest.status)?;

        let enforced = !contest.is_schedule_enforced;
        let mut active = contest.into_active_model();
        active.is_schedule_enforced = Set(enforced);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(contest_id, enforced, "Schedule enforcement toggled");
        Ok(updated)
    }
}

/// Judging windows for each of the examiner's roles. Round 2 examiners use
/// their table (table 1 when none is pinned). Roles whose round does not
/// exist yet contribute nothing.
async fn role_windows<C: ConnectionTrait>(
    conn: &C,
    contest: &contest::Model,
    rounds: &ContestRounds,
    assignments: &[examiner_assignment::Model],
) -> Result<Vec<DateWindow>, AppError> {
    let mut windows = Vec::new();
    for a in assignments {
        let Some(r) = rounds.get(a.role.round()) else {
            continue;
        };
        let window = match a.role {
            ExaminerRole::Round1 => round_window(contest, r),
            ExaminerRole::Round2 => {
                let table = judging_table::Entity::find()
                    .filter(judging_table::Column::RoundId.eq(r.id))
                    .filter(judging_table::Column::TableNumber.eq(a.table_number.unwrap_or(1)))
                    .one(conn)
                    .await?;
                match table {
                    Some(t) => table_window(contest, r, &t),
                    None => round_window(contest, r),
                }
            }
        };
        windows.extend(window);
    }
    Ok(windows)
}

use chrono::Utc;
use common::event::{ContestEvent, Event};
use common::lifecycle::{
    ensure_can_create_round1, ensure_can_create_round2, ensure_can_delete_round,
    ensure_can_publish,
};
use common::notify::Notifier;
use common::qualification::QualifiedEntry;
use common::validation::{
    RoundDates, ValidationReport, check_round_dates, check_table_window, validate_contest_config,
};
use common::{ContestStatus, DateWindow, ExaminerRole, RoundName, tables};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::qualification::QualificationService;
use crate::entity::{
    contest, evaluation, examiner_assignment, judging_table, original_submission, round, schedule,
    table_seat,
};
use crate::error::AppError;
use crate::models::round::{CreateRound2Request, validate_table_inputs};
use crate::utils::contest::{
    contest_config, contest_window, find_contest_for_update, is_unique_violation, load_rounds,
    round_dates,
};

/// A Round 2 judging table with its seats in rank order.
pub type SeatedTable = (judging_table::Model, Vec<table_seat::Model>);

/// Round creation, deletion and publishing. Each call is one transaction
/// holding the contest row lock.
pub struct RoundService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> RoundService<'a> {
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    pub async fn create_round1(
        &self,
        contest_id: i32,
        dates: RoundDates,
    ) -> Result<round::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        let rounds = load_rounds(&txn, contest_id).await?;
        ensure_can_create_round1(contest.status, rounds.round1.is_some())?;

        validate_contest_config(&contest_config(&contest, Some(dates.clone()))).into_result()?;

        let model = insert_round(&txn, contest_id, RoundName::Round1, dates).await?;
        txn.commit().await?;

        info!(contest_id, round_id = model.id, "Round 1 created");
        Ok(model)
    }

    /// Creates Round 2 from the current Round 1 qualifiers.
    ///
    /// Every qualifier must have a confirmed original. Qualifiers are dealt
    /// round-robin by rank across `number_of_tables_round2` tables.
    pub async fn create_round2(
        &self,
        contest_id: i32,
        req: CreateRound2Request,
    ) -> Result<(round::Model, Vec<SeatedTable>), AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        let rounds = load_rounds(&txn, contest_id).await?;

        let qualification = match rounds.round1.as_ref() {
            Some(r1) => Some(QualificationService::new(&txn).qualify(&contest, r1).await?),
            None => None,
        };
        let summary = qualification
            .as_ref()
            .map(|q| q.summary)
            .unwrap_or_default();
        ensure_can_create_round2(
            contest.status,
            rounds.round1.is_some(),
            rounds.round2.is_some(),
            contest.round2_quantity,
            &summary,
        )?;
        let qualification = qualification
            .ok_or_else(|| AppError::Configuration("Round 1 vanished during Round 2 creation".into()))?;

        validate_table_inputs(&req.tables, contest.number_of_tables_round2)?;
        let contest_window = contest_window(&contest);
        let round2_window = req.dates.window().or(contest_window);
        let mut report = ValidationReport::new();
        check_round_dates(&mut report, "round2", &req.dates, contest_window, false);
        for t in &req.tables {
            if let Some(window) = DateWindow::new(t.start_date, t.end_date) {
                check_table_window(&mut report, t.table_number, window, round2_window);
            }
        }
        report.into_result()?;

        let groups: Vec<Vec<QualifiedEntry>> = tables::allocate(
            &qualification.qualified,
            contest.number_of_tables_round2.max(0) as usize,
        )?;

        let round2 = insert_round(&txn, contest_id, RoundName::Round2, req.dates).await?;

        let mut seated = Vec::with_capacity(groups.len());
        for (table_number, group) in (1i32..).zip(groups) {
            let explicit = req.tables.iter().find(|t| t.table_number == table_number);
            let table = judging_table::ActiveModel {
                round_id: Set(round2.id),
                table_number: Set(table_number),
                start_date: Set(explicit.map(|t| t.start_date)),
                end_date: Set(explicit.map(|t| t.end_date)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            let mut seats = Vec::with_capacity(group.len());
            for entry in group {
                let seat = table_seat::ActiveModel {
                    table_id: Set(table.id),
                    competitor_id: Set(entry.competitor_id),
                    painting_id: Set(entry.painting_id),
                    qualification_rank: Set(entry.rank as i32),
                }
                .insert(&txn)
                .await?;
                seats.push(seat);
            }
            seated.push((table, seats));
        }

        txn.commit().await?;
        info!(
            contest_id,
            round_id = round2.id,
            tables = seated.len(),
            qualifiers = qualification.qualified.len(),
            "Round 2 created"
        );

        self.notify(ContestEvent::QualifiersAnnounced {
            contest_id,
            round_id: round2.id,
            competitor_ids: qualification.ranked_competitors(),
        })
        .await;

        Ok((round2, seated))
    }

    /// Deletes a round and everything scoped to it. DRAFT contests only.
    ///
    /// Assignments with the round's role go too, together with the schedules
    /// of examiners left without any assignment.
    pub async fn delete_round(&self, contest_id: i32, round_id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        ensure_can_delete_round(contest.status)?;

        let target = round::Entity::find_by_id(round_id)
            .filter(round::Column::ContestId.eq(contest_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Round not found".into()))?;

        let rounds = load_rounds(&txn, contest_id).await?;
        if target.name == RoundName::Round1 && rounds.round2.is_some() {
            return Err(AppError::StateConflict(
                "Delete Round 2 before deleting Round 1".into(),
            ));
        }

        let table_ids: Vec<i32> = judging_table::Entity::find()
            .filter(judging_table::Column::RoundId.eq(round_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        if !table_ids.is_empty() {
            table_seat::Entity::delete_many()
                .filter(table_seat::Column::TableId.is_in(table_ids.clone()))
                .exec(&txn)
                .await?;
            judging_table::Entity::delete_many()
                .filter(judging_table::Column::Id.is_in(table_ids))
                .exec(&txn)
                .await?;
        }
        evaluation::Entity::delete_many()
            .filter(evaluation::Column::RoundId.eq(round_id))
            .exec(&txn)
            .await?;

        if target.name == RoundName::Round1 {
            original_submission::Entity::delete_many()
                .filter(original_submission::Column::ContestId.eq(contest_id))
                .exec(&txn)
                .await?;
        }

        remove_role(&txn, contest_id, ExaminerRole::from(target.name)).await?;

        round::Entity::delete_by_id(round_id).exec(&txn).await?;
        txn.commit().await?;

        info!(contest_id, round_id, round = %target.name, "Round deleted");
        Ok(())
    }

    /// DRAFT → ACTIVE. Re-validates the stored configuration first.
    pub async fn publish(&self, contest_id: i32) -> Result<contest::Model, AppError> {
        let txn = self.db.begin().await?;
        let contest = find_contest_for_update(&txn, contest_id).await?;
        let rounds = load_rounds(&txn, contest_id).await?;
        ensure_can_publish(contest.status, rounds.round1.is_some())?;

        let round1 = rounds.round1.as_ref().map(round_dates);
        validate_contest_config(&contest_config(&contest, round1)).into_result()?;

        let mut active = contest.into_active_model();
        active.status = Set(ContestStatus::Active);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(contest_id, "Contest published");
        self.notify(ContestEvent::Published {
            contest_id,
            title: updated.title.clone(),
        })
        .await;

        Ok(updated)
    }

    /// Dispatch happens after commit; a failed dispatch does not undo it.
    async fn notify(&self, event: ContestEvent) {
        let event = event.to_generic_event();
        if let Err(e) = self.notifier.dispatch(&event).await {
            warn!(topic = %event.topic, error = %e, "Failed to dispatch notification");
        }
    }
}

async fn insert_round(
    txn: &DatabaseTransaction,
    contest_id: i32,
    name: RoundName,
    dates: RoundDates,
) -> Result<round::Model, AppError> {
    let model = round::ActiveModel {
        contest_id: Set(contest_id),
        name: Set(name),
        start_date: Set(dates.start_date),
        end_date: Set(dates.end_date),
        submission_deadline: Set(dates.submission_deadline),
        result_announce_date: Set(dates.result_announce_date),
        send_original_deadline: Set(dates.send_original_deadline),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    match model.insert(txn).await {
        Ok(inserted) => Ok(inserted),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::StateConflict(format!("{name} already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Drops every assignment with `role`, then the schedules of examiners that
/// no longer hold any assignment in the contest.
async fn remove_role(
    txn: &DatabaseTransaction,
    contest_id: i32,
    role: ExaminerRole,
) -> Result<(), AppError> {
    let affected: Vec<i32> = examiner_assignment::Entity::find()
        .filter(examiner_assignment::Column::ContestId.eq(contest_id))
        .filter(examiner_assignment::Column::Role.eq(role))
        .all(txn)
        .await?
        .into_iter()
        .map(|a| a.examiner_id)
        .collect();
    if affected.is_empty() {
        return Ok(());
    }

    examiner_assignment::Entity::delete_many()
        .filter(examiner_assignment::Column::ContestId.eq(contest_id))
        .filter(examiner_assignment::Column::Role.eq(role))
        .exec(txn)
        .await?;

    let still_assigned: Vec<i32> = examiner_assignment::Entity::find()
        .filter(examiner_assignment::Column::ContestId.eq(contest_id))
        .filter(examiner_assignment::Column::ExaminerId.is_in(affected.clone()))
        .all(txn)
        .await?
        .into_iter()
        .map(|a| a.examiner_id)
        .collect();
    let orphaned: Vec<i32> = affected
        .into_iter()
        .filter(|id| !still_assigned.contains(id))
        .collect();
    if !orphaned.is_empty() {
        schedule::Entity::delete_many()
            .filter(schedule::Column::ContestId.eq(contest_id))
            .filter(schedule::Column::ExaminerId.is_in(orphaned))
            .exec(txn)
            .await?;
    }
    Ok(())
}

use chrono::Utc;
use common::lifecycle::ensure_mutable;
use common::{ContestStatus, DateWindow};
use common::validation::{check_round_dates, check_table_window, validate_contest_config};
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use tracing::info;

use crate::entity::contest;
use crate::error::AppError;
use crate::models::contest::{UpdateContestRequest, validate_update_contest};
use crate::utils::contest::{
    ContestRounds, contest_config, contest_window, find_contest_for_update, load_rounds,
    load_tables, round_dates, round_window,
};

pub struct ContestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ContestService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a partial edit after validating the merged configuration
    /// against the contest's existing rounds.
    pub async fn update(
        &self,
        contest_id: i32,
        req: UpdateContestRequest,
    ) -> Result<(contest::Model, ContestRounds), AppError> {
        let txn = self.db.begin().await?;
        let current = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(current.status)?;

        let rounds = load_rounds(&txn, contest_id).await?;
        if req.changes_round2_sizing() && rounds.round2.is_some() {
            return Err(AppError::StateConflict(
                "Round 2 sizing cannot change once Round 2 exists".into(),
            ));
        }

        let mut report = validate_update_contest(&req);
        let mut merged = current.clone();
        if let Some(title) = req.title {
            merged.title = title.trim().to_string();
        }
        if let Some(description) = req.description {
            merged.description = description;
        }
        if let Some(start_date) = req.start_date {
            merged.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            merged.end_date = end_date;
        }
        if let Some(quantity) = req.round2_quantity {
            merged.round2_quantity = quantity;
        }
        if let Some(tables) = req.number_of_tables_round2 {
            merged.number_of_tables_round2 = tables;
        }

        report.merge(validate_contest_config(&contest_config(
            &merged,
            rounds.round1.as_ref().map(round_dates),
        )));
        if let Some(ref r2) = rounds.round2 {
            let window = contest_window(&merged);
            check_round_dates(&mut report, "round2", &round_dates(r2), window, false);
            // Explicit table dates stay inside Round 2, which falls back to
            // the edited contest dates.
            let round2_window = round_window(&merged, r2);
            for table in load_tables(&txn, r2.id).await? {
                if let Some(table_window) = DateWindow::from_bounds(table.start_date, table.end_date) {
                    check_table_window(&mut report, table.table_number, table_window, round2_window);
                }
            }
        }
        report.into_result()?;

        let mut active = current.into_active_model();
        active.title = Set(merged.title);
        active.description = Set(merged.description);
        active.start_date = Set(merged.start_date);
        active.end_date = Set(merged.end_date);
        active.round2_quantity = Set(merged.round2_quantity);
        active.number_of_tables_round2 = Set(merged.number_of_tables_round2);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(contest_id, "Contest updated");
        Ok((updated, rounds))
    }

    /// The external transition into COMPLETED or CANCELLED.
    pub async fn set_status(
        &self,
        contest_id: i32,
        status: ContestStatus,
    ) -> Result<(contest::Model, ContestRounds), AppError> {
        let txn = self.db.begin().await?;
        let current = find_contest_for_update(&txn, contest_id).await?;
        ensure_mutable(current.status)?;
        let rounds = load_rounds(&txn, contest_id).await?;

        let mut active = current.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(contest_id, status = %status, "Contest status changed");
        Ok((updated, rounds))
    }
}

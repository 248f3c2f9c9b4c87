use common::lifecycle::{RoundPhase, RoundProgress, RoundTimeline};
use common::validation::{ContestConfig, RoundDates};
use common::{DateWindow, RoundName};
use sea_orm::sea_query::LockType;
use sea_orm::{
    AccessMode, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::entity::{contest, judging_table, round};
use crate::error::AppError;

/// Look up a contest by ID, returning 404 if not found.
pub async fn find_contest<C: ConnectionTrait>(db: &C, id: i32) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

/// Look up a contest and hold its row lock until `txn` ends.
///
/// Every mutating engine operation goes through here first, which serializes
/// concurrent writers on the same contest.
pub async fn find_contest_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

/// A read-only transaction so multi-query reads see one snapshot.
pub async fn read_snapshot(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    db.begin_with_config(
        Some(IsolationLevel::RepeatableRead),
        Some(AccessMode::ReadOnly),
    )
    .await
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// The (at most two) rounds of a contest.
#[derive(Debug, Default, Clone)]
pub struct ContestRounds {
    pub round1: Option<round::Model>,
    pub round2: Option<round::Model>,
}

impl ContestRounds {
    pub fn get(&self, name: RoundName) -> Option<&round::Model> {
        match name {
            RoundName::Round1 => self.round1.as_ref(),
            RoundName::Round2 => self.round2.as_ref(),
        }
    }

    pub fn progress(&self) -> RoundProgress {
        let timeline = |r: &round::Model| RoundTimeline {
            end_date: r.end_date,
        };
        RoundProgress {
            round1: self.round1.as_ref().map(timeline),
            round2: self.round2.as_ref().map(timeline),
        }
    }
}

pub async fn load_rounds<C: ConnectionTrait>(
    db: &C,
    contest_id: i32,
) -> Result<ContestRounds, AppError> {
    let rows = round::Entity::find()
        .filter(round::Column::ContestId.eq(contest_id))
        .all(db)
        .await?;

    let mut rounds = ContestRounds::default();
    for r in rows {
        match r.name {
            RoundName::Round1 => rounds.round1 = Some(r),
            RoundName::Round2 => rounds.round2 = Some(r),
        }
    }
    Ok(rounds)
}

pub fn contest_phase(contest: &contest::Model, rounds: &ContestRounds) -> RoundPhase {
    RoundPhase::derive(contest.status, rounds.progress(), chrono::Utc::now())
}

pub fn round_dates(r: &round::Model) -> RoundDates {
    RoundDates {
        start_date: r.start_date,
        end_date: r.end_date,
        submission_deadline: r.submission_deadline,
        result_announce_date: r.result_announce_date,
        send_original_deadline: r.send_original_deadline,
    }
}

/// Builds the validator input from a persisted contest.
pub fn contest_config(contest: &contest::Model, round1: Option<RoundDates>) -> ContestConfig {
    ContestConfig {
        start_date: contest.start_date,
        end_date: contest.end_date,
        round2_quantity: contest.round2_quantity,
        number_of_tables_round2: contest.number_of_tables_round2,
        round1,
    }
}

pub fn contest_window(contest: &contest::Model) -> Option<DateWindow> {
    DateWindow::new(contest.start_date, contest.end_date)
}

/// The dates a round is judged in, falling back to the contest dates.
pub fn round_window(contest: &contest::Model, r: &round::Model) -> Option<DateWindow> {
    DateWindow::from_bounds(r.start_date, r.end_date).or_else(|| contest_window(contest))
}

/// A table's own dates, else its round's, else the contest's.
pub fn table_window(
    contest: &contest::Model,
    r: &round::Model,
    table: &judging_table::Model,
) -> Option<DateWindow> {
    DateWindow::from_bounds(table.start_date, table.end_date).or_else(|| round_window(contest, r))
}

pub async fn load_tables<C: ConnectionTrait>(
    db: &C,
    round_id: i32,
) -> Result<Vec<judging_table::Model>, AppError> {
    Ok(judging_table::Entity::find()
        .filter(judging_table::Column::RoundId.eq(round_id))
        .order_by_asc(judging_table::Column::TableNumber)
        .all(db)
        .await?)
}

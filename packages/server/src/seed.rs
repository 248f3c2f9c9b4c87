use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{evaluation, examiner_assignment, judging_table, painting, round, schedule};

/// Unique indexes backing the one-per-key rules (one Round 2 per contest,
/// one schedule per examiner and contest, ...).
fn unique_indexes() -> Vec<(&'static str, IndexCreateStatement)> {
    vec![
        (
            "uq_round_contest_name",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_round_contest_name")
                .table(round::Entity)
                .col(round::Column::ContestId)
                .col(round::Column::Name)
                .to_owned(),
        ),
        (
            "uq_table_round_number",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_table_round_number")
                .table(judging_table::Entity)
                .col(judging_table::Column::RoundId)
                .col(judging_table::Column::TableNumber)
                .to_owned(),
        ),
        (
            "uq_schedule_contest_examiner",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_schedule_contest_examiner")
                .table(schedule::Entity)
                .col(schedule::Column::ContestId)
                .col(schedule::Column::ExaminerId)
                .to_owned(),
        ),
        (
            "uq_assignment_contest_examiner_role",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_assignment_contest_examiner_role")
                .table(examiner_assignment::Entity)
                .col(examiner_assignment::Column::ContestId)
                .col(examiner_assignment::Column::ExaminerId)
                .col(examiner_assignment::Column::Role)
                .to_owned(),
        ),
        (
            "uq_evaluation_round_painting_examiner",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_evaluation_round_painting_examiner")
                .table(evaluation::Entity)
                .col(evaluation::Column::RoundId)
                .col(evaluation::Column::PaintingId)
                .col(evaluation::Column::ExaminerId)
                .to_owned(),
        ),
        (
            "uq_painting_contest_competitor",
            Index::create()
                .if_not_exists()
                .unique()
                .name("uq_painting_contest_competitor")
                .table(painting::Entity)
                .col(painting::Column::ContestId)
                .col(painting::Column::CompetitorId)
                .to_owned(),
        ),
    ]
}

/// Create the engine's unique indexes if they are missing.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    for (name, stmt) in unique_indexes() {
        db.execute_unprepared(&stmt.to_string(PostgresQueryBuilder))
            .await?;
        info!("Ensured index {} exists", name);
    }
    Ok(())
}

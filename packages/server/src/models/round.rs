use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::scoring::ScoreSummary;
use common::validation::RoundDates;
use serde::{Deserialize, Serialize};

use crate::entity::{judging_table, round, table_seat};
use crate::error::AppError;

/// Explicit dates for one Round 2 table. Tables without an entry inherit the
/// Round 2 dates.
#[derive(Clone, Debug, Deserialize, utoipa::ToSchema)]
pub struct TableWindowInput {
    #[schema(example = 1)]
    pub table_number: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Request body for creating Round 2. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateRound2Request {
    #[serde(default)]
    pub dates: RoundDates,
    #[serde(default)]
    pub tables: Vec<TableWindowInput>,
}

/// Structural checks on the table list; date checks happen in the validator.
pub fn validate_table_inputs(
    tables: &[TableWindowInput],
    number_of_tables: i32,
) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for t in tables {
        let field = format!("tables.{}", t.table_number);
        if t.table_number < 1 || t.table_number > number_of_tables {
            return Err(AppError::invalid(
                field,
                format!("table_number must be between 1 and {number_of_tables}"),
            ));
        }
        if !seen.insert(t.table_number) {
            return Err(AppError::invalid(field, "table_number listed twice"));
        }
        if t.end_date <= t.start_date {
            return Err(AppError::invalid(field, "end_date must be after start_date"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct SeatResponse {
    pub competitor_id: i32,
    pub painting_id: i32,
    pub qualification_rank: i32,
}

impl From<table_seat::Model> for SeatResponse {
    fn from(m: table_seat::Model) -> Self {
        Self {
            competitor_id: m.competitor_id,
            painting_id: m.painting_id,
            qualification_rank: m.qualification_rank,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TableResponse {
    pub id: i32,
    pub table_number: i32,
    /// NULL when the table inherits the Round 2 dates.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Seats in qualification-rank order.
    pub competitors: Vec<SeatResponse>,
}

impl TableResponse {
    pub fn new(table: judging_table::Model, mut seats: Vec<table_seat::Model>) -> Self {
        seats.sort_by_key(|s| s.qualification_rank);
        Self {
            id: table.id,
            table_number: table.table_number,
            start_date: table.start_date,
            end_date: table.end_date,
            competitors: seats.into_iter().map(Into::into).collect(),
        }
    }
}

/// Round-specific part of a round. Only Round 2 has tables.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(tag = "name")]
pub enum RoundKind {
    #[serde(rename = "ROUND_1")]
    Round1,
    #[serde(rename = "ROUND_2")]
    Round2 { tables: Vec<TableResponse> },
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundResponse {
    pub id: i32,
    pub contest_id: i32,
    #[serde(flatten)]
    pub kind: RoundKind,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
    pub result_announce_date: Option<DateTime<Utc>>,
    pub send_original_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RoundResponse {
    pub fn new(m: round::Model, kind: RoundKind) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            kind,
            start_date: m.start_date,
            end_date: m.end_date,
            submission_deadline: m.submission_deadline,
            result_announce_date: m.result_announce_date,
            send_original_deadline: m.send_original_deadline,
            created_at: m.created_at,
        }
    }
}

/// Aggregated scores of a round, best first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundScoresResponse {
    pub round_id: i32,
    pub scores: Vec<ScoreSummary>,
}

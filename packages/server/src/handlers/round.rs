use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::validation::RoundDates;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{round, table_seat};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::round::*;
use crate::services::round::RoundService;
use crate::state::AppState;
use crate::utils::contest::{find_contest, load_rounds, load_tables, read_snapshot};

#[utoipa::path(
    post,
    path = "/{id}/rounds/round1",
    tag = "Rounds",
    operation_id = "createRound1",
    summary = "Create Round 1",
    description = "Creates the open submission round. The contest must be `DRAFT` or `ACTIVE` without a Round 1. `start_date` and `end_date` are required; every deadline must fall inside the round, and the round inside the contest.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = RoundDates,
    responses(
        (status = 201, description = "Round 1 created", body = RoundResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Round 1 exists or contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id))]
pub async fn create_round1(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RoundDates>,
) -> Result<impl IntoResponse, AppError> {
    let model = RoundService::new(&state.db, state.notifier.as_ref())
        .create_round1(id, payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RoundResponse::new(model, RoundKind::Round1)),
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/rounds/round2",
    tag = "Rounds",
    operation_id = "createRound2",
    summary = "Create Round 2 from the Round 1 qualifiers",
    description = "Selects the top `round2_quantity` competitors of Round 1. Every one of them must have a confirmed original, otherwise nothing is created. Qualifiers are dealt round-robin by rank across `number_of_tables_round2` tables. Dispatches a `contest.qualifiers_announced` notification.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = CreateRound2Request,
    responses(
        (status = 201, description = "Round 2 created with its tables", body = RoundResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not enough confirmed originals (INSUFFICIENT_QUALIFIERS) or Round 2 not allowed (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id))]
pub async fn create_round2(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateRound2Request>,
) -> Result<impl IntoResponse, AppError> {
    let (model, seated) = RoundService::new(&state.db, state.notifier.as_ref())
        .create_round2(id, payload)
        .await?;
    let tables = seated
        .into_iter()
        .map(|(table, seats)| TableResponse::new(table, seats))
        .collect();
    Ok((
        StatusCode::CREATED,
        Json(RoundResponse::new(model, RoundKind::Round2 { tables })),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/rounds",
    tag = "Rounds",
    operation_id = "listRounds",
    summary = "List the rounds of a contest",
    description = "Returns Round 1 and Round 2 (when they exist). Round 2 carries its tables and seats.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Rounds of the contest", body = Vec<RoundResponse>),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id))]
pub async fn list_rounds(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<RoundResponse>>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    find_contest(&txn, id).await?;
    let rounds = load_rounds(&txn, id).await?;

    let mut data = Vec::with_capacity(2);
    if let Some(r1) = rounds.round1 {
        data.push(RoundResponse::new(r1, RoundKind::Round1));
    }
    if let Some(r2) = rounds.round2 {
        let tables = seated_tables(&txn, &r2).await?;
        data.push(RoundResponse::new(r2, RoundKind::Round2 { tables }));
    }
    txn.commit().await?;

    Ok(Json(data))
}

#[utoipa::path(
    delete,
    path = "/{id}/rounds/{round_id}",
    tag = "Rounds",
    operation_id = "deleteRound",
    summary = "Delete a round",
    description = "Only while the contest is `DRAFT`. Removes the round's tables, seats and evaluations, the assignments for that round, and the schedules of examiners left without an assignment. Round 1 cannot be deleted while Round 2 exists.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("round_id" = i32, Path, description = "Round ID"),
    ),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 404, description = "Contest or round not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest not DRAFT or Round 2 still exists (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id, round_id))]
pub async fn delete_round(
    State(state): State<AppState>,
    Path((id, round_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    RoundService::new(&state.db, state.notifier.as_ref())
        .delete_round(id, round_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Round 2 tables with their seats, by table number.
async fn seated_tables<C: ConnectionTrait>(
    conn: &C,
    r: &round::Model,
) -> Result<Vec<TableResponse>, AppError> {
    let tables = load_tables(conn, r.id).await?;
    let ids: Vec<i32> = tables.iter().map(|t| t.id).collect();

    let mut seats: HashMap<i32, Vec<table_seat::Model>> = HashMap::new();
    for seat in table_seat::Entity::find()
        .filter(table_seat::Column::TableId.is_in(ids))
        .all(conn)
        .await?
    {
        seats.entry(seat.table_id).or_default().push(seat);
    }

    Ok(tables
        .into_iter()
        .map(|t| {
            let table_seats = seats.remove(&t.id).unwrap_or_default();
            TableResponse::new(t, table_seats)
        })
        .collect())
}

use axum::Json;
use axum::extract::{Path, State};
use common::qualification::{Qualification, select_qualifiers};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::qualification::*;
use crate::services::qualification::QualificationService;
use crate::state::AppState;
use crate::utils::contest::{find_contest, load_rounds, read_snapshot};

#[utoipa::path(
    get,
    path = "/{id}/qualified",
    tag = "Qualification",
    operation_id = "listQualified",
    summary = "List the current Round 1 qualifiers",
    description = "Ranks Round 1 by average score (ties: earlier painting submission, then painting ID) and returns the top `round2_quantity` with their original submission status. `under_quota` is set when fewer competitors were scored.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Current qualifiers", body = QualifiedListResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id))]
pub async fn list_qualified(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<QualifiedListResponse>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    let contest = find_contest(&txn, id).await?;
    let rounds = load_rounds(&txn, id).await?;
    let quota = contest.round2_quantity.max(0) as u32;
    let qualification: Qualification = match rounds.round1 {
        Some(ref r1) => QualificationService::new(&txn).qualify(&contest, r1).await?,
        None => select_qualifiers(Vec::new(), quota, &Default::default()),
    };
    txn.commit().await?;

    Ok(Json(QualifiedListResponse {
        contest_id: id,
        quota: qualification.quota,
        under_quota: qualification.under_quota,
        summary: qualification.summary,
        qualified: qualification.qualified,
    }))
}

#[utoipa::path(
    put,
    path = "/{id}/qualified/{painting_id}/original",
    tag = "Qualification",
    operation_id = "setOriginalStatus",
    summary = "Record whether a qualifier handed in the original",
    description = "Sets the original submission status of a current qualifier. Locked once Round 2 exists or the contest is terminal.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("painting_id" = i32, Path, description = "Painting ID of the qualifier"),
    ),
    request_body = SetOriginalStatusRequest,
    responses(
        (status = 200, description = "Status recorded", body = OriginalStatusResponse),
        (status = 404, description = "Contest not found or painting not qualified (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Round 2 exists, no Round 1, or contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id, painting_id))]
pub async fn set_original_status(
    State(state): State<AppState>,
    Path((id, painting_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<SetOriginalStatusRequest>,
) -> Result<Json<OriginalStatusResponse>, AppError> {
    let saved = QualificationService::new(&state.db)
        .set_original_status(id, painting_id, payload.has_submitted_original)
        .await?;
    Ok(Json(saved.into()))
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::round;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::directory::*;
use crate::models::round::RoundScoresResponse;
use crate::services::directory::DirectoryService;
use crate::services::qualification::QualificationService;
use crate::state::AppState;
use crate::utils::contest::{find_contest, read_snapshot};

#[utoipa::path(
    post,
    path = "/{id}/paintings",
    tag = "Directory",
    operation_id = "registerPainting",
    summary = "Register a competitor's painting",
    description = "Creates the competitor on first use of the name. One painting per competitor per contest.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = RegisterPaintingRequest,
    responses(
        (status = 201, description = "Painting registered", body = PaintingResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Competitor already entered or contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id, competitor = %payload.competitor_name))]
pub async fn register_painting(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RegisterPaintingRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_painting(&payload)?;
    let model = DirectoryService::new(&state.db)
        .register_painting(id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(PaintingResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/{id}/rounds/{round_id}/evaluations",
    tag = "Directory",
    operation_id = "submitEvaluation",
    summary = "Record an examiner's score for a painting",
    description = "One score per (round, painting, examiner); submitting again replaces it. Round 2 only accepts seated paintings.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("round_id" = i32, Path, description = "Round ID"),
    ),
    request_body = SubmitEvaluationRequest,
    responses(
        (status = 200, description = "Score recorded", body = EvaluationResponse),
        (status = 400, description = "Score out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest, round, painting or examiner not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Painting not seated in Round 2 or contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id, round_id, painting_id = payload.painting_id))]
pub async fn submit_evaluation(
    State(state): State<AppState>,
    Path((id, round_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<SubmitEvaluationRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    validate_evaluation(&payload)?;
    let saved = DirectoryService::new(&state.db)
        .submit_evaluation(id, round_id, &payload)
        .await?;
    Ok(Json(saved.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/rounds/{round_id}/scores",
    tag = "Directory",
    operation_id = "roundScores",
    summary = "Aggregated scores of a round",
    description = "Average score and evaluation count per competitor, best first. Unscored competitors are absent.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("round_id" = i32, Path, description = "Round ID"),
    ),
    responses(
        (status = 200, description = "Round scores", body = RoundScoresResponse),
        (status = 404, description = "Contest or round not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id, round_id))]
pub async fn round_scores(
    State(state): State<AppState>,
    Path((id, round_id)): Path<(i32, i32)>,
) -> Result<Json<RoundScoresResponse>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    find_contest(&txn, id).await?;
    let target = round::Entity::find_by_id(round_id)
        .filter(round::Column::ContestId.eq(id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Round not found".into()))?;
    let scores = QualificationService::new(&txn)
        .round_scores(id, &target)
        .await?;
    txn.commit().await?;

    Ok(Json(RoundScoresResponse { round_id, scores }))
}

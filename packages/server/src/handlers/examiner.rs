use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{examiner, examiner_assignment, schedule};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::examiner::*;
use crate::services::examiner::ExaminerService;
use crate::state::AppState;
use crate::utils::contest::{find_contest, read_snapshot};

#[utoipa::path(
    post,
    path = "/",
    tag = "Examiners",
    operation_id = "createExaminer",
    summary = "Add an examiner to the directory",
    request_body = CreateExaminerRequest,
    responses(
        (status = 201, description = "Examiner created", body = ExaminerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_examiner(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateExaminerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_examiner(&payload)?;

    let model = examiner::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        specialization: Set(payload.specialization.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ExaminerResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Examiners",
    operation_id = "listExaminers",
    summary = "List all examiners",
    responses(
        (status = 200, description = "Examiner directory", body = Vec<ExaminerResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_examiners(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExaminerResponse>>, AppError> {
    let data = examiner::Entity::find()
        .order_by_asc(examiner::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(ExaminerResponse::from)
        .collect();
    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/{id}/examiners",
    tag = "Contest Examiners",
    operation_id = "assignExaminer",
    summary = "Assign an examiner to a round",
    description = "An examiner holds at most one assignment per role in a contest. Round 2 examiners may be pinned to a table; unpinned ones judge table 1.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = AssignExaminerRequest,
    responses(
        (status = 201, description = "Examiner assigned", body = AssignmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest or examiner not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already assigned for this role (DUPLICATE_ASSIGNMENT) or contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id, examiner_id = payload.examiner_id))]
pub async fn assign_examiner(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AssignExaminerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = ExaminerService::new(&state.db).assign(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(AssignmentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/examiners",
    tag = "Contest Examiners",
    operation_id = "listContestExaminers",
    summary = "List the examiner assignments of a contest",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Assignments", body = Vec<AssignmentResponse>),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id))]
pub async fn list_contest_examiners(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    find_contest(&txn, id).await?;
    let data = examiner_assignment::Entity::find()
        .filter(examiner_assignment::Column::ContestId.eq(id))
        .order_by_asc(examiner_assignment::Column::Id)
        .all(&txn)
        .await?
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();
    txn.commit().await?;
    Ok(Json(data))
}

#[utoipa::path(
    delete,
    path = "/{id}/examiners/{examiner_id}",
    tag = "Contest Examiners",
    operation_id = "removeExaminer",
    summary = "Remove an examiner from a contest",
    description = "Deletes every assignment and the schedule of the examiner in this contest.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("examiner_id" = i32, Path, description = "Examiner ID"),
    ),
    responses(
        (status = 204, description = "Examiner removed"),
        (status = 404, description = "Contest not found or examiner not assigned (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id, examiner_id))]
pub async fn remove_examiner(
    State(state): State<AppState>,
    Path((id, examiner_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    ExaminerService::new(&state.db)
        .remove(id, examiner_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/{id}/examiners/{examiner_id}/schedule",
    tag = "Schedules",
    operation_id = "setSchedule",
    summary = "Set an examiner's visit date",
    description = "Creates or moves the single schedule of an examiner in a contest. With enforcement on, the date must fall inside the window of one of the examiner's roles (Round 2: the pinned table, else table 1).",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("examiner_id" = i32, Path, description = "Examiner ID"),
    ),
    request_body = SetScheduleRequest,
    responses(
        (status = 200, description = "Schedule saved", body = ScheduleResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found or examiner not assigned (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest terminal or no window to check against (STATE_CONFLICT)", body = ErrorBody),
        (status = 422, description = "Date outside every role window (DATE_OUT_OF_WINDOW)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(contest_id = id, examiner_id, date = %payload.date))]
pub async fn set_schedule(
    State(state): State<AppState>,
    Path((id, examiner_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<SetScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    validate_set_schedule(&payload)?;
    let task = payload
        .task
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| state.config.engine.default_schedule_task.clone());

    let saved = ExaminerService::new(&state.db)
        .set_schedule(id, examiner_id, payload.date, task)
        .await?;
    Ok(Json(saved.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/schedules",
    tag = "Schedules",
    operation_id = "listSchedules",
    summary = "List the schedules of a contest",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Schedules by date", body = Vec<ScheduleResponse>),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id))]
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    find_contest(&txn, id).await?;
    let data = schedule::Entity::find()
        .filter(schedule::Column::ContestId.eq(id))
        .order_by_asc(schedule::Column::Date)
        .order_by_asc(schedule::Column::Id)
        .all(&txn)
        .await?
        .into_iter()
        .map(ScheduleResponse::from)
        .collect();
    txn.commit().await?;
    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/{id}/schedule-enforcement/toggle",
    tag = "Schedules",
    operation_id = "toggleScheduleEnforcement",
    summary = "Flip schedule date enforcement",
    description = "Turns window checks for schedule dates on or off. Existing schedules are not re-checked.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "New enforcement state", body = EnforcementResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(contest_id = id))]
pub async fn toggle_schedule_enforcement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EnforcementResponse>, AppError> {
    let updated = ExaminerService::new(&state.db)
        .toggle_enforcement(id)
        .await?;
    Ok(Json(EnforcementResponse {
        contest_id: updated.id,
        is_schedule_enforced: updated.is_schedule_enforced,
    }))
}

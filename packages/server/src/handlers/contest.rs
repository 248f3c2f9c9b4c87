use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::ContestStatus;
use common::lifecycle::RoundPhase;
use common::validation::validate_contest_config;
use sea_orm::*;
use tracing::instrument;

use crate::entity::contest;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::contest::*;
use crate::models::shared::Pagination;
use crate::services::contest::ContestService;
use crate::services::round::RoundService;
use crate::state::AppState;
use crate::utils::contest::{contest_phase, find_contest, load_rounds, read_snapshot};

#[utoipa::path(
    post,
    path = "/validate",
    tag = "Contests",
    operation_id = "validateContest",
    summary = "Validate a contest configuration without saving",
    description = "Runs the same validator used by create and edit. Always returns 200; `ok` is false when any field fails, with one error per failing field.",
    request_body = ValidateContestRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidationResultResponse),
        (status = 400, description = "Malformed body (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(payload))]
pub async fn validate_contest(
    AppJson(payload): AppJson<ValidateContestRequest>,
) -> Json<ValidationResultResponse> {
    let report = validate_contest_config(&payload.into());
    Json(report.into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Contests",
    operation_id = "createContest",
    summary = "Create a new contest",
    description = "Creates a contest in `DRAFT`. `round2_quantity` must be divisible by `number_of_tables_round2`; a quantity of 0 disables Round 2 and needs 0 tables.",
    request_body = CreateContestRequest,
    responses(
        (status = 201, description = "Contest created", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_contest(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContestRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_contest(&payload).into_result()?;

    let now = chrono::Utc::now();
    let new_contest = contest::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        round2_quantity: Set(payload.round2_quantity),
        number_of_tables_round2: Set(payload.number_of_tables_round2),
        status: Set(ContestStatus::Draft),
        is_schedule_enforced: Set(payload
            .is_schedule_enforced
            .unwrap_or(state.config.engine.schedule_enforced_by_default)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_contest.insert(&state.db).await?;
    tracing::info!(contest_id = model.id, "Contest created");

    Ok((
        StatusCode::CREATED,
        Json(ContestResponse::new(model, RoundPhase::NoRounds)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contests",
    operation_id = "listContests",
    summary = "List contests with pagination",
    description = "Returns contests, newest first, optionally filtered by status.",
    params(ContestListQuery),
    responses(
        (status = 200, description = "List of contests", body = ContestListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_contests(
    State(state): State<AppState>,
    Query(query): Query<ContestListQuery>,
) -> Result<Json<ContestListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = contest::Entity::find();
    if let Some(status) = query.status {
        select = select.filter(contest::Column::Status.eq(status));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(contest::Column::CreatedAt)
        .order_by_desc(contest::Column::Id)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(ContestListItem::from)
        .collect();

    Ok(Json(ContestListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contests",
    operation_id = "getContest",
    summary = "Get a contest by ID",
    description = "Returns the contest with its derived round phase.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest details", body = ContestResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    let txn = read_snapshot(&state.db).await?;
    let model = find_contest(&txn, id).await?;
    let rounds = load_rounds(&txn, id).await?;
    txn.commit().await?;

    let phase = contest_phase(&model, &rounds);
    Ok(Json(ContestResponse::new(model, phase)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Contests",
    operation_id = "updateContest",
    summary = "Update a contest",
    description = "Partially updates a contest. The merged configuration is re-validated against existing rounds. Round 2 sizing is frozen once Round 2 exists.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = UpdateContestRequest,
    responses(
        (status = 200, description = "Contest updated", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Terminal contest or Round 2 exists (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContestRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    if payload == UpdateContestRequest::default() {
        return Err(AppError::invalid("body", "At least one field must be provided"));
    }

    let (model, rounds) = ContestService::new(&state.db).update(id, payload).await?;
    let phase = contest_phase(&model, &rounds);
    Ok(Json(ContestResponse::new(model, phase)))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Contests",
    operation_id = "updateContestStatus",
    summary = "Complete or cancel a contest",
    description = "Moves a non-terminal contest to `COMPLETED` or `CANCELLED`. Terminal contests reject every further mutation.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = UpdateContestStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest already terminal (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id, status = %payload.status))]
pub async fn update_contest_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContestStatusRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    validate_status_request(&payload)?;
    let (model, rounds) = ContestService::new(&state.db)
        .set_status(id, payload.status)
        .await?;
    let phase = contest_phase(&model, &rounds);
    Ok(Json(ContestResponse::new(model, phase)))
}

#[utoipa::path(
    post,
    path = "/{id}/publish",
    tag = "Contests",
    operation_id = "publishContest",
    summary = "Publish a draft contest",
    description = "Moves a `DRAFT` contest with a Round 1 to `ACTIVE` after re-running the validator. Irreversible. Dispatches a `contest.published` notification.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest published", body = ContestResponse),
        (status = 400, description = "Stored configuration invalid (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not DRAFT or no Round 1 (STATE_CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn publish_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    let model = RoundService::new(&state.db, state.notifier.as_ref())
        .publish(id)
        .await?;
    let rounds = load_rounds(&state.db, id).await?;
    let phase = contest_phase(&model, &rounds);
    Ok(Json(ContestResponse::new(model, phase)))
}

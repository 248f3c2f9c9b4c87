use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{contest, directory, examiner, qualification, round};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/contests", contest_routes())
        .nest("/examiners", examiner_routes())
}

fn contest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(contest::list_contests, contest::create_contest))
        .routes(routes!(contest::validate_contest))
        .routes(routes!(contest::get_contest, contest::update_contest))
        .routes(routes!(contest::update_contest_status))
        .routes(routes!(contest::publish_contest))
        .merge(round_routes())
        .merge(qualification_routes())
        .merge(contest_examiner_routes())
}

fn round_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(round::list_rounds))
        .routes(routes!(round::create_round1))
        .routes(routes!(round::create_round2))
        .routes(routes!(round::delete_round))
        .routes(routes!(directory::submit_evaluation))
        .routes(routes!(directory::round_scores))
        .routes(routes!(directory::register_painting))
}

fn qualification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(qualification::list_qualified))
        .routes(routes!(qualification::set_original_status))
}

fn contest_examiner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            examiner::list_contest_examiners,
            examiner::assign_examiner
        ))
        .routes(routes!(examiner::remove_examiner))
        .routes(routes!(examiner::set_schedule))
        .routes(routes!(examiner::list_schedules))
        .routes(routes!(examiner::toggle_schedule_enforcement))
}

fn examiner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        examiner::list_examiners,
        examiner::create_examiner
    ))
}

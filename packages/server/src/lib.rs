pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Art Contest Round Engine API",
        version = "1.0.0",
        description = "Rounds, qualification, judging tables and examiner schedules for art contests"
    ),
    tags(
        (name = "Contests", description = "Contest configuration and lifecycle"),
        (name = "Rounds", description = "Round 1 / Round 2 creation and deletion"),
        (name = "Qualification", description = "Round 1 qualifiers and original submissions"),
        (name = "Examiners", description = "Examiner directory"),
        (name = "Contest Examiners", description = "Examiner assignments per contest"),
        (name = "Schedules", description = "Examiner visit dates and enforcement"),
        (name = "Directory", description = "Paintings and the evaluation feed"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));
    if origins.is_empty() {
        layer
    } else {
        layer.allow_origin(origins)
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    let cors = cors_layer(&state.config.server.cors);
    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
}

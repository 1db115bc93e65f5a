//! Router assembly.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::handlers::course;
use crate::state::AppState;

// Above the 50 MB feature-video ceiling, with headroom for the rest of the
// form.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v0/courses",
            get(course::list_courses).post(course::create_course),
        )
        .route(
            "/api/v0/courses/{id}",
            get(course::get_course)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        .route("/api/v0/categories", get(course::list_categories))
        .route("/api/v0/openapi.json", get(openapi_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

//! Application state shared by all handlers.

use coursecraft_services::CourseService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub service: CourseService,
    pub pool: PgPool,
}

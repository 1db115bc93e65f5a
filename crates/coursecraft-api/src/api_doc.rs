//! OpenAPI document for the course authoring API.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use coursecraft_core::models::{
    ColumnPosition, ContentResponse, ContentType, CoursePage, CourseResponse, CourseSummary,
    ModuleResponse, VideoSourceType,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::course::list_courses,
        crate::handlers::course::create_course,
        crate::handlers::course::get_course,
        crate::handlers::course::update_course,
        crate::handlers::course::delete_course,
        crate::handlers::course::list_categories,
    ),
    components(schemas(
        CourseResponse,
        ModuleResponse,
        ContentResponse,
        CoursePage,
        CourseSummary,
        ContentType,
        VideoSourceType,
        ColumnPosition,
        ErrorResponse,
    )),
    tags(
        (name = "courses", description = "Course authoring endpoints")
    )
)]
pub struct ApiDoc;

//! Course endpoints
//!
//! Thin HTTP layer: multipart requests are parsed into the typed course
//! tree, then everything is delegated to the course service. Stored media
//! paths are resolved to public URLs when building responses.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use coursecraft_core::constants::COURSE_CATEGORIES;
use coursecraft_core::models::{CoursePage, CourseResponse};

use crate::error::{ErrorResponse, HttpAppError};
use crate::form::course_payload_from_multipart;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<i64>,
}

/// List courses, newest first, ten per page with module counts.
#[utoipa::path(
    get,
    path = "/api/v0/courses",
    tag = "courses",
    params(("page" = Option<i64>, Query, description = "1-based page number")),
    responses(
        (status = 200, description = "One page of courses", body = CoursePage),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CoursePage>, HttpAppError> {
    let page = state.service.list_courses(query.page.unwrap_or(1)).await?;
    Ok(Json(page))
}

/// Create a course from a multipart submission.
#[utoipa::path(
    post,
    path = "/api/v0/courses",
    tag = "courses",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Upload rejected or malformed request", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CourseResponse>), HttpAppError> {
    let payload = course_payload_from_multipart(multipart).await?;
    let course = state.service.create_course(payload).await?;
    let response = CourseResponse::from_course(course, |path| state.service.file_url(path));
    Ok((StatusCode::CREATED, Json(response)))
}

/// Fetch one course with its full module/content tree.
#[utoipa::path(
    get,
    path = "/api/v0/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, HttpAppError> {
    let course = state.service.get_course(id).await?;
    let response = CourseResponse::from_course(course, |path| state.service.file_url(path));
    Ok(Json(response))
}

/// Update a course; the module/content subtree is fully replaced.
#[utoipa::path(
    put,
    path = "/api/v0/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course id")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Upload rejected or malformed request", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<CourseResponse>, HttpAppError> {
    let payload = course_payload_from_multipart(multipart).await?;
    let course = state.service.update_course(id, payload).await?;
    let response = CourseResponse::from_course(course, |path| state.service.file_url(path));
    Ok(Json(response))
}

/// Delete a course and its associated media.
#[utoipa::path(
    delete,
    path = "/api/v0/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    state.service.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Category choices for the authoring form.
#[utoipa::path(
    get,
    path = "/api/v0/categories",
    tag = "courses",
    responses((status = 200, description = "Available categories", body = [String]))
)]
pub async fn list_categories() -> Json<Vec<&'static str>> {
    Json(COURSE_CATEGORIES.to_vec())
}

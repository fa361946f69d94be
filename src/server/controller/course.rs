use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        course::{
            CertificateResponseDto, CourseDetailDto, CourseDto, CreateCourseDto,
            CreateReviewDto, PaginatedCoursesDto, UpdateCourseDto,
        },
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::course::{CreateCourseParams, UpdateCourseParams},
        service::course::CourseService,
        state::AppState,
    },
};

pub static COURSE_TAG: &str = "course";

#[derive(Deserialize, IntoParams)]
pub struct CourseListParams {
    /// Case-insensitive match on title or description
    pub keyword: Option<String>,
    /// 1-based page, 10 courses per page
    pub page: Option<u64>,
}

/// Create a course owned by the caller.
///
/// # Access Control
/// - `Instructor`, `Admin`
///
/// # Returns
/// - `201 Created` - The new course
/// - `400 Bad Request` - Missing title, description or category, or an invalid level
/// - `403 Forbidden` - Caller is not an instructor or admin
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = COURSE_TAG,
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseDto),
        (status = 400, description = "Invalid course data", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Role not allowed", body = ErrorDto)
    ),
)]
pub async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let params = CreateCourseParams::from_dto(user.id, payload)?;
    let course = CourseService::new(&state.db).create(params).await?;

    Ok((StatusCode::CREATED, Json(course.into_dto())))
}

/// Public course catalog, newest first.
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = COURSE_TAG,
    params(CourseListParams),
    responses(
        (status = 200, description = "Page of courses", body = PaginatedCoursesDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = CourseService::new(&state.db)
        .list(params.keyword, params.page)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto())))
}

/// Course with instructor, lessons in order and reviews.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let detail = CourseService::new(&state.db).detail(id).await?;

    Ok((StatusCode::OK, Json(detail.into_dto())))
}

/// Update a course. Only the owning instructor or an admin may do this.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseDto),
        (status = 400, description = "Invalid update", body = ErrorDto),
        (status = 403, description = "Not the course owner", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn update_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let params = UpdateCourseParams::from_dto(payload)?;
    let course = CourseService::new(&state.db)
        .update(&user, id, params)
        .await?;

    Ok((StatusCode::OK, Json(course.into_dto())))
}

/// Delete a course and everything that only exists for it.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course removed", body = MessageDto),
        (status = 403, description = "Not the course owner", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn delete_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    CourseService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Course removed"))))
}

/// Enroll the caller directly, without the payment flow.
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrolled", body = MessageDto),
        (status = 400, description = "Already enrolled", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn enroll_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    CourseService::new(&state.db).enroll(&user, id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Successfully enrolled in course")),
    ))
}

/// Review a course once; the course rating becomes the mean of all reviews.
#[utoipa::path(
    post,
    path = "/api/courses/{id}/reviews",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review added", body = MessageDto),
        (status = 400, description = "Invalid rating or already reviewed", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn review_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    CourseService::new(&state.db)
        .review(user.id, id, payload.rating, payload.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDto::new("Review added"))))
}

/// Certificate metadata for a completed course.
///
/// The first successful call stamps the download time on the enrollment.
#[utoipa::path(
    get,
    path = "/api/courses/{id}/certificate",
    tag = COURSE_TAG,
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Certificate metadata", body = CertificateResponseDto),
        (status = 400, description = "Course not completed", body = ErrorDto),
        (status = 403, description = "Not enrolled", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn get_certificate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let certificate = CourseService::new(&state.db).certificate(&user, id).await?;

    Ok((StatusCode::OK, Json(certificate)))
}

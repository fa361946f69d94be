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
        lesson::{CreateLessonDto, LessonDto, UpdateLessonDto},
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::lesson::{CreateLessonParams, Lesson},
        service::lesson::LessonService,
        state::AppState,
    },
};

pub static LESSON_TAG: &str = "lesson";

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LessonListParams {
    /// Restrict to one course
    pub course_id: Option<i32>,
}

/// Add a lesson to a course the caller teaches.
#[utoipa::path(
    post,
    path = "/api/lessons",
    tag = LESSON_TAG,
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = LessonDto),
        (status = 400, description = "Missing course or title", body = ErrorDto),
        (status = 403, description = "Not the course instructor", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLessonDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let course_id = payload
        .course_id
        .ok_or_else(|| AppError::BadRequest("Course ID required".to_string()))?;
    let params = CreateLessonParams::from_dto(course_id, payload)?;
    let lesson = LessonService::new(&state.db).create(&user, params).await?;

    Ok((StatusCode::CREATED, Json(lesson.into_dto())))
}

/// Lessons ordered by their position in the course.
#[utoipa::path(
    get,
    path = "/api/lessons",
    tag = LESSON_TAG,
    params(LessonListParams),
    responses(
        (status = 200, description = "Lessons", body = Vec<LessonDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn list_lessons(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LessonListParams>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let lessons = LessonService::new(&state.db).list(params.course_id).await?;
    let lessons: Vec<LessonDto> = lessons.into_iter().map(Lesson::into_dto).collect();

    Ok((StatusCode::OK, Json(lessons)))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    tag = LESSON_TAG,
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson with its course", body = LessonDto),
        (status = 404, description = "Lesson not found", body = ErrorDto)
    ),
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let lesson = LessonService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(lesson.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    tag = LESSON_TAG,
    params(("id" = i32, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = LessonDto),
        (status = 403, description = "Not the course instructor", body = ErrorDto),
        (status = 404, description = "Lesson not found", body = ErrorDto)
    ),
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLessonDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let lesson = LessonService::new(&state.db)
        .update(&user, id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(lesson.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    tag = LESSON_TAG,
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted", body = MessageDto),
        (status = 403, description = "Not the course instructor", body = ErrorDto),
        (status = 404, description = "Lesson not found", body = ErrorDto)
    ),
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    LessonService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Lesson deleted"))))
}

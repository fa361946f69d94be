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
        assignment::{AssignmentDto, CreateAssignmentDto, UpdateAssignmentDto},
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::assignment::{Assignment, CreateAssignmentParams},
        service::assignment::AssignmentService,
        state::AppState,
    },
};

pub static ASSIGNMENT_TAG: &str = "assignment";

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListParams {
    /// Restrict to one course
    pub course_id: Option<i32>,
}

/// Create an assignment for a course the caller teaches.
#[utoipa::path(
    post,
    path = "/api/assignments",
    tag = ASSIGNMENT_TAG,
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentDto),
        (status = 400, description = "Missing course or title", body = ErrorDto),
        (status = 403, description = "Not the course instructor", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAssignmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let course_id = payload
        .course_id
        .ok_or_else(|| AppError::BadRequest("Course ID required".to_string()))?;
    let params = CreateAssignmentParams::from_dto(course_id, user.id, payload)?;
    let assignment = AssignmentService::new(&state.db)
        .create(&user, params)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/assignments",
    tag = ASSIGNMENT_TAG,
    params(AssignmentListParams),
    responses(
        (status = 200, description = "Assignments with course and lesson titles", body = Vec<AssignmentDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AssignmentListParams>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let assignments = AssignmentService::new(&state.db)
        .list(params.course_id)
        .await?;
    let assignments: Vec<AssignmentDto> =
        assignments.into_iter().map(Assignment::into_dto).collect();

    Ok((StatusCode::OK, Json(assignments)))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    tag = ASSIGNMENT_TAG,
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment", body = AssignmentDto),
        (status = 404, description = "Assignment not found", body = ErrorDto)
    ),
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let assignment = AssignmentService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(assignment.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    tag = ASSIGNMENT_TAG,
    params(("id" = i32, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentDto),
        (status = 403, description = "Not the assignment author", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto)
    ),
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAssignmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let assignment = AssignmentService::new(&state.db)
        .update(&user, id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(assignment.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    tag = ASSIGNMENT_TAG,
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = MessageDto),
        (status = 403, description = "Not the assignment author", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto)
    ),
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    AssignmentService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Assignment deleted"))))
}

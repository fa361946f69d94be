use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::Role;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        parent::{ChildrenDto, LinkChildDto, LinkChildResponseDto, StudentReportResponseDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::User,
        service::parent::ParentService,
        state::AppState,
    },
};

pub static PARENT_TAG: &str = "parent";

async fn require_parent(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    AuthGuard::new(&state.db, &state.tokens, headers)
        .require(&[Permission::Roles(&[Role::Parent])])
        .await
}

/// Students linked to the calling parent.
#[utoipa::path(
    get,
    path = "/api/parents/students",
    tag = PARENT_TAG,
    responses(
        (status = 200, description = "Linked students with progress summary", body = ChildrenDto),
        (status = 403, description = "Parents only", body = ErrorDto)
    ),
)]
pub async fn children(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let parent = require_parent(&state, &headers).await?;

    let children = ParentService::new(&state.db).children(parent.id).await?;

    Ok((StatusCode::OK, Json(ChildrenDto { children })))
}

/// Progress report for one linked student.
///
/// # Returns
/// - `200 OK` - Hours, achievements and per-course progress
/// - `403 Forbidden` - Student is not linked to the caller
/// - `404 Not Found` - Student no longer exists
#[utoipa::path(
    get,
    path = "/api/parents/student/{studentId}/report",
    tag = PARENT_TAG,
    params(("studentId" = i32, Path, description = "Student user ID")),
    responses(
        (status = 200, description = "Student report", body = StudentReportResponseDto),
        (status = 403, description = "Student not linked to this parent", body = ErrorDto),
        (status = 404, description = "Student not found", body = ErrorDto)
    ),
)]
pub async fn report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(student_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let parent = require_parent(&state, &headers).await?;

    let report = ParentService::new(&state.db)
        .report(parent.id, student_id)
        .await?;

    Ok((StatusCode::OK, Json(StudentReportResponseDto { report })))
}

/// Link a student account by id or email.
///
/// # Returns
/// - `201 Created` - Student linked
/// - `400 Bad Request` - No identifier, account is not a student, or already linked
/// - `404 Not Found` - No matching account
#[utoipa::path(
    post,
    path = "/api/parents/link",
    tag = PARENT_TAG,
    request_body = LinkChildDto,
    responses(
        (status = 201, description = "Student linked", body = LinkChildResponseDto),
        (status = 400, description = "Cannot link this account", body = ErrorDto),
        (status = 404, description = "Student not found", body = ErrorDto)
    ),
)]
pub async fn link_child(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LinkChildDto>,
) -> Result<impl IntoResponse, AppError> {
    let parent = require_parent(&state, &headers).await?;

    let student = ParentService::new(&state.db)
        .link(parent.id, payload.email, payload.student_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkChildResponseDto {
            message: "Student linked".to_string(),
            student: student.to_summary(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/parents/child/{studentId}",
    tag = PARENT_TAG,
    params(("studentId" = i32, Path, description = "Student user ID")),
    responses(
        (status = 200, description = "Student unlinked", body = MessageDto),
        (status = 404, description = "Student not linked", body = ErrorDto)
    ),
)]
pub async fn unlink_child(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(student_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let parent = require_parent(&state, &headers).await?;

    ParentService::new(&state.db)
        .unlink(parent.id, student_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Student unlinked"))))
}

use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        progress::{ProgressOverviewDto, RecentActivityDto},
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::progress::ProgressService,
        state::AppState,
    },
};

pub static PROGRESS_TAG: &str = "progress";

/// Learning statistics, skills, certificates and recent activity for the caller.
#[utoipa::path(
    get,
    path = "/api/progress/overview",
    tag = PROGRESS_TAG,
    responses(
        (status = 200, description = "Progress overview", body = ProgressOverviewDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let overview = ProgressService::new(&state.db).overview(&user).await?;

    Ok((StatusCode::OK, Json(overview)))
}

#[utoipa::path(
    get,
    path = "/api/progress/activity",
    tag = PROGRESS_TAG,
    responses(
        (status = 200, description = "Most recent activity entries", body = RecentActivityDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn activity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let activity = ProgressService::new(&state.db).activity(user.id).await?;

    Ok((StatusCode::OK, Json(activity)))
}

/// Download the completion certificate of a course as a PDF attachment.
///
/// Also served at `/api/courses/{courseId}/certificate/pdf`.
///
/// # Returns
/// - `200 OK` - `application/pdf` body
/// - `400 Bad Request` - Course not fully completed
/// - `404 Not Found` - No progress entry for the course
#[utoipa::path(
    get,
    path = "/api/progress/certificates/{courseId}/download",
    tag = PROGRESS_TAG,
    params(("courseId" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Certificate PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Course not completed", body = ErrorDto),
        (status = 404, description = "Enrollment for this course not found", body = ErrorDto)
    ),
)]
pub async fn download_certificate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let file = ProgressService::new(&state.db)
        .download_certificate(&user, course_id)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    ))
}

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::Role;

use crate::{
    model::{
        api::{ErrorDto, SuccessDto},
        instructor::{InstructorCourseDto, InstructorStudentDto, StudentCourseProgressDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::User,
        service::instructor::InstructorService,
        state::AppState,
    },
};

pub static INSTRUCTOR_TAG: &str = "instructor";

async fn require_instructor(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    AuthGuard::new(&state.db, &state.tokens, headers)
        .require(&[Permission::Roles(&[Role::Instructor])])
        .await
}

/// The caller's courses with ordered lessons and enrolled students.
#[utoipa::path(
    get,
    path = "/api/instructor/courses",
    tag = INSTRUCTOR_TAG,
    responses(
        (status = 200, description = "Instructor courses", body = SuccessDto<Vec<InstructorCourseDto>>),
        (status = 403, description = "Instructors only", body = ErrorDto)
    ),
)]
pub async fn courses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let instructor = require_instructor(&state, &headers).await?;

    let courses = InstructorService::new(&state.db)
        .courses(&instructor)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::counted(courses))))
}

/// Unique students across the caller's courses.
#[utoipa::path(
    get,
    path = "/api/instructor/students",
    tag = INSTRUCTOR_TAG,
    responses(
        (status = 200, description = "Students", body = SuccessDto<Vec<InstructorStudentDto>>),
        (status = 403, description = "Instructors only", body = ErrorDto)
    ),
)]
pub async fn students(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let instructor = require_instructor(&state, &headers).await?;

    let students = InstructorService::new(&state.db)
        .students(instructor.id)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::counted(students))))
}

#[utoipa::path(
    get,
    path = "/api/instructor/students/{studentId}/progress/{courseId}",
    tag = INSTRUCTOR_TAG,
    params(
        ("studentId" = i32, Path, description = "Student user ID"),
        ("courseId" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Student progress in the course", body = SuccessDto<StudentCourseProgressDto>),
        (status = 403, description = "Course of another instructor", body = ErrorDto),
        (status = 404, description = "Student, course or enrollment not found", body = ErrorDto)
    ),
)]
pub async fn student_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((student_id, course_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let instructor = require_instructor(&state, &headers).await?;

    let progress = InstructorService::new(&state.db)
        .student_progress(&instructor, student_id, course_id)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(progress))))
}

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
        student::{
            CompleteLessonDto, LessonCompletionDto, StudentAchievementsDto, StudentActivityDto,
            StudentCourseDetailDto, StudentCourseDto, StudentDashboardDto, StudentProfileDto,
            UpdateStudentProfileDto, UserCourseDto,
        },
        user::UserDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::User,
        service::student::StudentService,
        state::AppState,
    },
};

pub static STUDENT_TAG: &str = "student";

const STUDENT_ONLY: Permission = Permission::Roles(&[Role::Student]);

async fn require_student(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    AuthGuard::new(&state.db, &state.tokens, headers)
        .require(&[STUDENT_ONLY])
        .await
}

/// Enrollment counts, average progress and achievements of the calling student.
#[utoipa::path(
    get,
    path = "/api/student/dashboard",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "Dashboard", body = SuccessDto<StudentDashboardDto>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let dashboard = StudentService::new(&state.db).dashboard(user.id).await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(dashboard))))
}

#[utoipa::path(
    get,
    path = "/api/student/profile",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "Profile with enrolled courses and achievements", body = SuccessDto<StudentProfileDto>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let profile = StudentService::new(&state.db).profile(user.id).await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(profile))))
}

/// Update name, phone, bio, avatar or address. Blank values are ignored.
#[utoipa::path(
    put,
    path = "/api/student/profile",
    tag = STUDENT_TAG,
    request_body = UpdateStudentProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = SuccessDto<UserDto>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateStudentProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let updated = StudentService::new(&state.db)
        .update_profile(user.id, payload)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SuccessDto::new(updated.into_dto()).with_message("Profile updated successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/student/courses",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "Enrolled courses with progress", body = SuccessDto<Vec<StudentCourseDto>>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn courses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let courses = StudentService::new(&state.db).courses(user.id).await?;

    Ok((StatusCode::OK, Json(SuccessDto::counted(courses))))
}

/// One enrolled course with its lessons and the student's progress.
#[utoipa::path(
    get,
    path = "/api/student/courses/{courseId}",
    tag = STUDENT_TAG,
    params(("courseId" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course and progress", body = SuccessDto<StudentCourseDetailDto>),
        (status = 403, description = "Not enrolled in this course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn course(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let course = StudentService::new(&state.db)
        .course(user.id, course_id)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(course))))
}

/// Enroll directly, without payment.
#[utoipa::path(
    post,
    path = "/api/student/enroll/{courseId}",
    tag = STUDENT_TAG,
    params(("courseId" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Successfully enrolled in course", body = SuccessDto<UserCourseDto>),
        (status = 400, description = "Already enrolled in this course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn enroll(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let user_course = StudentService::new(&state.db)
        .enroll(&user, course_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SuccessDto::new(user_course.into_dto()).with_message("Successfully enrolled in course")),
    ))
}

/// Mark a lesson complete and recompute course completion.
///
/// Completing a lesson twice does not change the completed set, but any
/// `hoursSpent` sent is still added. Reaching 100% awards a course completion
/// achievement once.
///
/// # Returns
/// - `200 OK` - Updated completion figures
/// - `403 Forbidden` - Not enrolled in this course
/// - `404 Not Found` - Lesson is not part of the course
#[utoipa::path(
    post,
    path = "/api/student/courses/{courseId}/lessons/{lessonId}/complete",
    tag = STUDENT_TAG,
    params(
        ("courseId" = i32, Path, description = "Course ID"),
        ("lessonId" = i32, Path, description = "Lesson ID")
    ),
    request_body = CompleteLessonDto,
    responses(
        (status = 200, description = "Lesson marked as complete", body = SuccessDto<LessonCompletionDto>),
        (status = 403, description = "Not enrolled in this course", body = ErrorDto),
        (status = 404, description = "Lesson not found", body = ErrorDto)
    ),
)]
pub async fn complete_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((course_id, lesson_id)): Path<(i32, i32)>,
    payload: Option<Json<CompleteLessonDto>>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;
    let hours_spent = payload.and_then(|Json(dto)| dto.hours_spent);

    let completion = StudentService::new(&state.db)
        .complete_lesson(user.id, course_id, lesson_id, hours_spent)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SuccessDto::new(completion).with_message("Lesson marked as complete")),
    ))
}

/// The student's achievements grouped by type.
#[utoipa::path(
    get,
    path = "/api/student/achievements",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "Grouped achievements", body = SuccessDto<StudentAchievementsDto>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn achievements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let achievements = StudentService::new(&state.db).achievements(user.id).await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(achievements))))
}

/// Learning hours per course, streak and last login.
#[utoipa::path(
    get,
    path = "/api/student/activity",
    tag = STUDENT_TAG,
    responses(
        (status = 200, description = "Learning activity", body = SuccessDto<StudentActivityDto>),
        (status = 403, description = "Students only", body = ErrorDto)
    ),
)]
pub async fn activity(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = require_student(&state, &headers).await?;

    let activity = StudentService::new(&state.db).activity(user.id).await?;

    Ok((StatusCode::OK, Json(SuccessDto::new(activity))))
}

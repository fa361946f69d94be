use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        enrollment::{
            ActivateEnrollmentDto, ActivateEnrollmentResponseDto, CreateEnrollmentDto,
            CreateEnrollmentResponseDto, EnrollmentDto, EnrollmentStatusDto,
            EnrollmentWithRefsDto, UpdateEnrollmentDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::enrollment::EnrollmentWithRefs,
        service::enrollment::EnrollmentService,
        state::AppState,
    },
};

pub static ENROLLMENT_TAG: &str = "enrollment";

/// Open a pending enrollment before paying for a course.
///
/// # Returns
/// - `201 Created` - Pending enrollment id
/// - `400 Bad Request` - No course id, or an enrollment already exists for the course
///   (the body then carries its `enrollmentId`)
/// - `404 Not Found` - Unknown course
#[utoipa::path(
    post,
    path = "/api/enrollments/create",
    tag = ENROLLMENT_TAG,
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Pending enrollment created", body = CreateEnrollmentResponseDto),
        (status = 400, description = "Missing course or already enrolled", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateEnrollmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let course_id = payload
        .course_id
        .ok_or_else(|| AppError::BadRequest("Course ID is required".to_string()))?;
    let enrollment = EnrollmentService::new(&state.db)
        .create(user.id, course_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEnrollmentResponseDto {
            message: "Enrollment created, proceed to payment".to_string(),
            enrollment_id: enrollment.id,
        }),
    ))
}

/// Activate a pending enrollment with a completed payment.
///
/// The payment must be completed, made by the caller and for the enrollment's course.
#[utoipa::path(
    post,
    path = "/api/enrollments/activate/{enrollment_id}",
    tag = ENROLLMENT_TAG,
    params(("enrollment_id" = i32, Path, description = "Enrollment ID")),
    request_body = ActivateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment activated", body = ActivateEnrollmentResponseDto),
        (status = 400, description = "Missing, incomplete or mismatched payment", body = ErrorDto),
        (status = 403, description = "Enrollment or payment of another user", body = ErrorDto),
        (status = 404, description = "Enrollment or payment not found", body = ErrorDto)
    ),
)]
pub async fn activate_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(enrollment_id): Path<i32>,
    Json(payload): Json<ActivateEnrollmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let payment_id = payload
        .payment_id
        .ok_or_else(|| AppError::BadRequest("Payment ID is required".to_string()))?;
    let enrollment = EnrollmentService::new(&state.db)
        .activate(user.id, enrollment_id, payment_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ActivateEnrollmentResponseDto {
            message: "Enrollment activated successfully".to_string(),
            enrollment: enrollment.into_dto(),
        }),
    ))
}

/// The caller's enrollments with course and payment summaries.
#[utoipa::path(
    get,
    path = "/api/enrollments",
    tag = ENROLLMENT_TAG,
    responses(
        (status = 200, description = "Enrollments", body = Vec<EnrollmentWithRefsDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let enrollments = EnrollmentService::new(&state.db).list(user.id).await?;
    let enrollments: Vec<EnrollmentWithRefsDto> = enrollments
        .into_iter()
        .map(EnrollmentWithRefs::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(enrollments)))
}

/// Whether the caller is enrolled in a course, and how far along they are.
#[utoipa::path(
    get,
    path = "/api/enrollments/course/{course_id}",
    tag = ENROLLMENT_TAG,
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Enrollment status", body = EnrollmentStatusDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn enrollment_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let status = EnrollmentService::new(&state.db)
        .status(user.id, course_id)
        .await?;

    Ok((StatusCode::OK, Json(status)))
}

/// Merge progress, watch hours and completion into the caller's enrollment.
#[utoipa::path(
    put,
    path = "/api/enrollments/{enrollment_id}",
    tag = ENROLLMENT_TAG,
    params(("enrollment_id" = i32, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentDto),
        (status = 403, description = "Enrollment of another user", body = ErrorDto),
        (status = 404, description = "Enrollment not found", body = ErrorDto)
    ),
)]
pub async fn update_enrollment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(enrollment_id): Path<i32>,
    Json(payload): Json<UpdateEnrollmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let enrollment = EnrollmentService::new(&state.db)
        .update(user.id, enrollment_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(enrollment.into_dto())))
}

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::Role;

use crate::{
    model::{
        api::ErrorDto,
        payment::{CreatePaymentDto, InstructorRevenueDto, PaymentDto, UpdatePaymentDto},
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::payment::Payment,
        service::payment::PaymentService,
        state::AppState,
    },
};

pub static PAYMENT_TAG: &str = "payment";

/// Record a payment for a course. The amount defaults to the course price.
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentDto),
        (status = 400, description = "Missing course or method", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePaymentDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let payment = PaymentService::new(&state.db).create(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(payment.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    responses(
        (status = 200, description = "Caller's payments", body = Vec<PaymentDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn list_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let payments = PaymentService::new(&state.db).list(&user).await?;
    let payments: Vec<PaymentDto> = payments.into_iter().map(Payment::into_dto).collect();

    Ok((StatusCode::OK, Json(payments)))
}

/// One payment, visible to the payer and admins.
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = PaymentDto),
        (status = 403, description = "Payment of another user", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto)
    ),
)]
pub async fn get_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let payment = PaymentService::new(&state.db).get(&user, id).await?;

    Ok((StatusCode::OK, Json(payment.into_dto())))
}

/// Total revenue over the caller's courses.
#[utoipa::path(
    get,
    path = "/api/payments/instructor/revenue",
    tag = PAYMENT_TAG,
    responses(
        (status = 200, description = "Revenue summary", body = InstructorRevenueDto),
        (status = 403, description = "Role not allowed", body = ErrorDto)
    ),
)]
pub async fn instructor_revenue(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let revenue = PaymentService::new(&state.db)
        .instructor_revenue(user.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(InstructorRevenueDto {
            total_revenue: revenue.total_revenue,
            total_payments: revenue.payments.len(),
            payment_details: revenue.payments.into_iter().map(Payment::into_dto).collect(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/payments/{id}",
    tag = PAYMENT_TAG,
    params(("id" = i32, Path, description = "Payment ID")),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Payment updated", body = PaymentDto),
        (status = 400, description = "Invalid status", body = ErrorDto),
        (status = 403, description = "Admin only", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto)
    ),
)]
pub async fn update_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePaymentDto>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(&[Role::Admin])])
        .await?;

    let payment = PaymentService::new(&state.db).update(id, payload).await?;

    Ok((StatusCode::OK, Json(payment.into_dto())))
}

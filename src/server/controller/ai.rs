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
        ai::{AiInteractionDto, AiQueryDto, ChatReplyDto, ChatRequestDto},
        api::{ErrorDto, MessageDto},
        payment::{ProcessPaymentDto, ProcessPaymentResponseDto, VerifyUpiDto, VerifyUpiResponseDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::ai::AiInteraction,
        service::{ai_gateway::ChatRequest, ai_tutor::AiTutorService, payment},
        state::AppState,
    },
};

pub static AI_TAG: &str = "ai";

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    /// Restrict to one course
    pub course_id: Option<i32>,
}

/// Proxy a single message to the configured chat provider.
///
/// Models starting with `claude` go to the Claude endpoint, everything else to OpenAI.
/// A demo reply is returned when the provider has no key or fails.
///
/// # Returns
/// - `200 OK` - Provider or demo reply
/// - `400 Bad Request` - No message
/// - `403 Forbidden` - Claude requested while disabled
#[utoipa::path(
    post,
    path = "/api/ai/chat",
    tag = AI_TAG,
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Chat reply", body = ChatReplyDto),
        (status = 400, description = "Message is required", body = ErrorDto),
        (status = 403, description = "Requested model is not enabled", body = ErrorDto)
    ),
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Message is required".to_string()))?;

    let reply = state
        .ai
        .chat(ChatRequest {
            message,
            model: payload.model,
            max_tokens: payload.max_tokens,
            temperature: payload.temperature,
        })
        .await?;

    Ok((StatusCode::OK, Json(ChatReplyDto { reply })))
}

/// Simulated UPI id verification.
#[utoipa::path(
    post,
    path = "/api/ai/verify-upi",
    tag = AI_TAG,
    request_body = VerifyUpiDto,
    responses(
        (status = 200, description = "UPI id verified", body = VerifyUpiResponseDto),
        (status = 400, description = "Missing or malformed UPI id", body = ErrorDto)
    ),
)]
pub async fn verify_upi(Json(payload): Json<VerifyUpiDto>) -> Result<impl IntoResponse, AppError> {
    let verified = payment::verify_upi(payload).await?;

    Ok((StatusCode::OK, Json(verified)))
}

/// Simulated payment processing that always succeeds.
#[utoipa::path(
    post,
    path = "/api/ai/process-payment",
    tag = AI_TAG,
    request_body = ProcessPaymentDto,
    responses(
        (status = 200, description = "Payment processed", body = ProcessPaymentResponseDto),
        (status = 400, description = "Method and amount required", body = ErrorDto)
    ),
)]
pub async fn process_payment(
    Json(payload): Json<ProcessPaymentDto>,
) -> Result<impl IntoResponse, AppError> {
    let processed = payment::process_payment(payload).await?;

    Ok((StatusCode::OK, Json(processed)))
}

/// Ask the tutor a question; the exchange is stored in the caller's history.
#[utoipa::path(
    post,
    path = "/api/ai/query",
    tag = AI_TAG,
    request_body = AiQueryDto,
    responses(
        (status = 201, description = "Stored interaction", body = AiInteractionDto),
        (status = 400, description = "Query cannot be empty", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AiQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let interaction = AiTutorService::new(&state.db)
        .query(user.id, payload.course_id, &payload.query)
        .await?;

    Ok((StatusCode::CREATED, Json(interaction.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/ai/history",
    tag = AI_TAG,
    params(HistoryParams),
    responses(
        (status = 200, description = "Caller's interactions, newest first", body = Vec<AiInteractionDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let interactions = AiTutorService::new(&state.db)
        .history(user.id, params.course_id)
        .await?;
    let interactions: Vec<AiInteractionDto> = interactions
        .into_iter()
        .map(AiInteraction::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(interactions)))
}

#[utoipa::path(
    get,
    path = "/api/ai/{id}",
    tag = AI_TAG,
    params(("id" = i32, Path, description = "Interaction ID")),
    responses(
        (status = 200, description = "Interaction", body = AiInteractionDto),
        (status = 403, description = "Interaction of another user", body = ErrorDto),
        (status = 404, description = "Interaction not found", body = ErrorDto)
    ),
)]
pub async fn get_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let interaction = AiTutorService::new(&state.db).get(&user, id).await?;

    Ok((StatusCode::OK, Json(interaction.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/ai/{id}",
    tag = AI_TAG,
    params(("id" = i32, Path, description = "Interaction ID")),
    responses(
        (status = 200, description = "Interaction deleted", body = MessageDto),
        (status = 403, description = "Interaction of another user", body = ErrorDto),
        (status = 404, description = "Interaction not found", body = ErrorDto)
    ),
)]
pub async fn delete_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    AiTutorService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Interaction deleted"))))
}

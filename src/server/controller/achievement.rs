use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::Role;

use crate::{
    model::{
        achievement::{AchievementDto, CreateAchievementDto, LeaderboardEntryDto, PointsDto},
        api::ErrorDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::achievement::{Achievement, CreateAchievementParams},
        service::achievement::AchievementService,
        state::AppState,
    },
};

pub static ACHIEVEMENT_TAG: &str = "achievement";

/// Award an achievement to a user.
///
/// # Returns
/// - `201 Created` - The stored award
/// - `400 Bad Request` - Missing recipient, title or type
/// - `403 Forbidden` - Caller is not an admin
/// - `404 Not Found` - Unknown recipient or course
#[utoipa::path(
    post,
    path = "/api/achievements",
    tag = ACHIEVEMENT_TAG,
    request_body = CreateAchievementDto,
    responses(
        (status = 201, description = "Achievement awarded", body = AchievementDto),
        (status = 400, description = "Invalid achievement data", body = ErrorDto),
        (status = 403, description = "Admin only", body = ErrorDto),
        (status = 404, description = "User or course not found", body = ErrorDto)
    ),
)]
pub async fn create_achievement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateAchievementDto>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(&[Role::Admin])])
        .await?;

    let params = CreateAchievementParams::from_dto(payload)?;
    let achievement = AchievementService::new(&state.db).create(params).await?;

    Ok((StatusCode::CREATED, Json(achievement.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/achievements/my-achievements",
    tag = ACHIEVEMENT_TAG,
    responses(
        (status = 200, description = "Caller's achievements, newest first", body = Vec<AchievementDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn my_achievements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let achievements: Vec<AchievementDto> = AchievementService::new(&state.db)
        .mine(user.id)
        .await?
        .into_iter()
        .map(Achievement::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(achievements)))
}

/// The five most recently earned achievements across all users.
#[utoipa::path(
    get,
    path = "/api/achievements/recent",
    tag = ACHIEVEMENT_TAG,
    responses(
        (status = 200, description = "Recent achievements", body = Vec<AchievementDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn recent_achievements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let achievements: Vec<AchievementDto> = AchievementService::new(&state.db)
        .recent()
        .await?
        .into_iter()
        .map(Achievement::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(achievements)))
}

#[utoipa::path(
    get,
    path = "/api/achievements/points",
    tag = ACHIEVEMENT_TAG,
    responses(
        (status = 200, description = "Caller's total points", body = PointsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn points(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let points = AchievementService::new(&state.db).points(user.id).await?;

    Ok((StatusCode::OK, Json(PointsDto { points })))
}

#[utoipa::path(
    get,
    path = "/api/achievements/leaderboard",
    tag = ACHIEVEMENT_TAG,
    responses(
        (status = 200, description = "Top users by total points", body = Vec<LeaderboardEntryDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let leaderboard = AchievementService::new(&state.db).leaderboard().await?;

    Ok((StatusCode::OK, Json(leaderboard)))
}

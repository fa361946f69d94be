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
        flag::{FeatureFlagDto, FeatureFlagValueDto, SetFeatureFlagDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::flag::FeatureFlag,
        service::flag::FeatureFlagService,
        state::AppState,
    },
};

pub static FLAG_TAG: &str = "flag";

const ADMIN_ONLY: Permission = Permission::Roles(&[Role::Admin]);

/// Read a flag value. Unknown keys are created with value `false`.
#[utoipa::path(
    get,
    path = "/api/flags/{key}",
    tag = FLAG_TAG,
    params(("key" = String, Path, description = "Flag key")),
    responses(
        (status = 200, description = "Flag value", body = FeatureFlagValueDto)
    ),
)]
pub async fn get_flag(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let flag = FeatureFlagService::new(&state.db).get(&key).await?;

    Ok((StatusCode::OK, Json(flag.into_value_dto())))
}

#[utoipa::path(
    get,
    path = "/api/flags",
    tag = FLAG_TAG,
    responses(
        (status = 200, description = "All flags", body = Vec<FeatureFlagDto>),
        (status = 403, description = "Admin only", body = ErrorDto)
    ),
)]
pub async fn list_flags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[ADMIN_ONLY])
        .await?;

    let flags: Vec<FeatureFlagDto> = FeatureFlagService::new(&state.db)
        .list()
        .await?
        .into_iter()
        .map(FeatureFlag::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(flags)))
}

/// Set a flag value, creating the flag if needed. The caller is stamped as `updatedBy`.
#[utoipa::path(
    put,
    path = "/api/flags/{key}",
    tag = FLAG_TAG,
    params(("key" = String, Path, description = "Flag key")),
    request_body = SetFeatureFlagDto,
    responses(
        (status = 200, description = "Stored flag", body = FeatureFlagDto),
        (status = 403, description = "Admin only", body = ErrorDto)
    ),
)]
pub async fn set_flag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(payload): Json<SetFeatureFlagDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[ADMIN_ONLY])
        .await?;

    let flag = FeatureFlagService::new(&state.db)
        .set(&key, payload.value, admin.id)
        .await?;

    Ok((StatusCode::OK, Json(flag.into_dto())))
}

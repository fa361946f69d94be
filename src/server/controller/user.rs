use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        user::{
            ProfileSummaryDto, StreakDto, UpdateUserProfileDto, UploadPhotoResponseDto,
            UserProfileDto, WeeklyStatsDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::WeeklyStats,
        service::user::{PhotoUpload, UserService},
        state::AppState,
    },
};

pub static USER_TAG: &str = "user";

/// Multipart field carrying the profile photo.
const PHOTO_FIELD: &str = "profilePhoto";

/// Profile of the caller with learning counters.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Profile and stats", body = UserProfileDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let (user, stats) = UserService::new(&state.db).profile(caller.id).await?;

    Ok((StatusCode::OK, Json(user.into_profile_dto(stats))))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = USER_TAG,
    request_body = UpdateUserProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileSummaryDto),
        (status = 400, description = "Empty name", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateUserProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let user = UserService::new(&state.db)
        .update_profile(
            caller.id,
            payload.full_name,
            payload.phone,
            payload.location,
            payload.bio,
        )
        .await?;

    Ok((StatusCode::OK, Json(user.into_profile_summary())))
}

/// Upload a profile photo.
///
/// Expects a multipart body with the image in the `profilePhoto` field. The image is
/// forwarded to image storage and the returned URL becomes the avatar.
///
/// # Returns
/// - `200 OK` - Stored avatar URL
/// - `400 Bad Request` - No file in the request
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Storage rejected or is not configured
#[utoipa::path(
    post,
    path = "/api/users/upload-photo",
    tag = USER_TAG,
    request_body(content_type = "multipart/form-data", description = "Image in the `profilePhoto` field"),
    responses(
        (status = 200, description = "Photo uploaded", body = UploadPhotoResponseDto),
        (status = 400, description = "No file uploaded", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Upload failed", body = ErrorDto)
    ),
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        upload = Some(PhotoUpload {
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        });
        break;
    }

    let Some(upload) = upload.filter(|u| !u.bytes.is_empty()) else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    let avatar = UserService::new(&state.db)
        .upload_photo(caller.id, upload, &state.media)
        .await?;

    Ok((
        StatusCode::OK,
        Json(UploadPhotoResponseDto {
            message: "Photo uploaded".to_string(),
            avatar,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/streak",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Login streak", body = StreakDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_streak(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let user = UserService::new(&state.db).streak(caller.id).await?;

    Ok((StatusCode::OK, Json(user.streak_dto())))
}

#[utoipa::path(
    get,
    path = "/api/users/weekly-stats",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Weekly counters", body = WeeklyStatsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_weekly_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let stats = UserService::new(&state.db).weekly_stats(caller.id).await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

/// Replace the caller's weekly counters. Missing fields reset to zero.
#[utoipa::path(
    put,
    path = "/api/users/weekly-stats",
    tag = USER_TAG,
    request_body = WeeklyStatsDto,
    responses(
        (status = 200, description = "Counters stored", body = WeeklyStatsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn update_weekly_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WeeklyStatsDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let stats = UserService::new(&state.db)
        .set_weekly_stats(caller.id, WeeklyStats::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

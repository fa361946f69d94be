use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        user::{
            AuthUserDto, LoginDto, LoginResponseDto, RegisterDto, RegisterResponseDto,
            UpdateAuthProfileDto, UserDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::{RegisterParams, UpdateOwnAccountParams},
        service::auth::AuthService,
        state::AppState,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Register a new account.
///
/// Public registration accepts the student, parent and instructor roles; the role
/// defaults to student. Also mounted at `POST /api/users/register`.
///
/// # Returns
/// - `201 Created` - Account created, token issued
/// - `400 Bad Request` - Missing fields, invalid email, short password or taken email
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = RegisterResponseDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state.db, &state.tokens, &state.mailer);

    let (user, token) = service.register(RegisterParams::from_dto(payload)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponseDto {
            message: "Account successfully created".to_string(),
            user: user.into_auth_dto(token),
        }),
    ))
}

/// Log in with email and password.
///
/// Advances the daily login streak. Also mounted at `POST /api/users/login`.
///
/// # Returns
/// - `200 OK` - Identity, token and streak
/// - `401 Unauthorized` - Unknown email or wrong password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponseDto),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state.db, &state.tokens, &state.mailer);

    let (user, token) = service.login(&payload.email, &payload.password).await?;
    let streak_days = user.streak_days;

    Ok((
        StatusCode::OK,
        Json(LoginResponseDto {
            user: user.into_auth_dto(token),
            streak_days,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Authenticated user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Update the caller's own account.
///
/// Merges the provided fields; address objects are merged key by key. A new token is
/// issued with the response.
///
/// # Returns
/// - `200 OK` - Updated identity with a new token
/// - `400 Bad Request` - Invalid or taken email, short password
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = AUTH_TAG,
    request_body = UpdateAuthProfileDto,
    responses(
        (status = 200, description = "Account updated", body = AuthUserDto),
        (status = 400, description = "Invalid update", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateAuthProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let caller = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let service = AuthService::new(&state.db, &state.tokens, &state.mailer);
    let (user, token) = service
        .update_account(caller.id, UpdateOwnAccountParams::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(user.into_auth_dto(token))))
}

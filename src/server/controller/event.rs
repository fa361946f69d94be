use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        event::{CreateEventDto, EventDto, UpdateEventDto},
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::event::{CreateEventParams, Event, UpdateEventParams},
        service::event::EventService,
        state::AppState,
    },
};

pub static EVENT_TAG: &str = "event";

fn into_dtos(events: Vec<Event>) -> Vec<EventDto> {
    events.into_iter().map(Event::into_dto).collect()
}

/// Schedule an event hosted by the caller.
///
/// # Returns
/// - `201 Created` - The event
/// - `400 Bad Request` - Missing title, date, times or location, or an invalid type
#[utoipa::path(
    post,
    path = "/api/events",
    tag = EVENT_TAG,
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid event data", body = ErrorDto),
        (status = 403, description = "Role not allowed", body = ErrorDto)
    ),
)]
pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateEventDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let params = CreateEventParams::from_dto(user.id, payload)?;
    let event = EventService::new(&state.db).create(params).await?;

    Ok((StatusCode::CREATED, Json(event.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = EVENT_TAG,
    responses(
        (status = 200, description = "All events by date", body = Vec<EventDto>)
    ),
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let events = EventService::new(&state.db).list().await?;

    Ok((StatusCode::OK, Json(into_dtos(events))))
}

/// Events the caller hosts or attends.
#[utoipa::path(
    get,
    path = "/api/events/my-events",
    tag = EVENT_TAG,
    responses(
        (status = 200, description = "Caller's events", body = Vec<EventDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn my_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let events = EventService::new(&state.db).mine(user.id).await?;

    Ok((StatusCode::OK, Json(into_dtos(events))))
}

/// The five soonest scheduled events.
#[utoipa::path(
    get,
    path = "/api/events/upcoming",
    tag = EVENT_TAG,
    responses(
        (status = 200, description = "Upcoming events", body = Vec<EventDto>)
    ),
)]
pub async fn upcoming_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let events = EventService::new(&state.db).upcoming().await?;

    Ok((StatusCode::OK, Json(into_dtos(events))))
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/enroll",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Enrolled", body = MessageDto),
        (status = 400, description = "Event full or already enrolled", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto)
    ),
)]
pub async fn enroll_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    EventService::new(&state.db).enroll(user.id, id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Successfully enrolled in event")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event with host and course", body = EventDto),
        (status = 404, description = "Event not found", body = ErrorDto)
    ),
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let event = EventService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = EventDto),
        (status = 403, description = "Not the event host", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto)
    ),
)]
pub async fn update_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEventDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let params = UpdateEventParams::from_dto(payload)?;
    let event = EventService::new(&state.db).update(&user, id, params).await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event removed", body = MessageDto),
        (status = 403, description = "Not the event host", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto)
    ),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    EventService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Event removed"))))
}

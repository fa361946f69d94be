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
        api::{ErrorDto, MessageDto},
        quiz::{CreateQuizDto, QuizDto, QuizResultDto, SubmitQuizDto, UpdateQuizDto},
    },
    server::{
        controller::INSTRUCTOR_OR_ADMIN,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::quiz::{CreateQuizParams, Quiz},
        service::quiz::QuizService,
        state::AppState,
    },
};

pub static QUIZ_TAG: &str = "quiz";

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct QuizListParams {
    /// Restrict to one course
    pub course_id: Option<i32>,
}

/// Create a quiz from authored questions.
///
/// Each question lists its options as plain strings and names the correct one; marks
/// default to 1 and the passing percentage to 60.
#[utoipa::path(
    post,
    path = "/api/quiz",
    tag = QUIZ_TAG,
    request_body = CreateQuizDto,
    responses(
        (status = 201, description = "Quiz created", body = QuizDto),
        (status = 400, description = "Invalid quiz data", body = ErrorDto),
        (status = 403, description = "Not the course instructor", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto)
    ),
)]
pub async fn create_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateQuizDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let course_id = payload
        .course_id
        .ok_or_else(|| AppError::BadRequest("Course ID required".to_string()))?;
    let params = CreateQuizParams::from_dto(course_id, user.id, payload)?;
    let quiz = QuizService::new(&state.db).create(&user, params).await?;

    Ok((StatusCode::CREATED, Json(quiz.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/quiz",
    tag = QUIZ_TAG,
    params(QuizListParams),
    responses(
        (status = 200, description = "Quizzes", body = Vec<QuizDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn list_quizzes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let quizzes = QuizService::new(&state.db).list(params.course_id).await?;
    let quizzes: Vec<QuizDto> = quizzes.into_iter().map(Quiz::into_dto).collect();

    Ok((StatusCode::OK, Json(quizzes)))
}

#[utoipa::path(
    get,
    path = "/api/quiz/{id}",
    tag = QUIZ_TAG,
    params(("id" = i32, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz with questions", body = QuizDto),
        (status = 404, description = "Quiz not found", body = ErrorDto)
    ),
)]
pub async fn get_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let quiz = QuizService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(quiz.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/quiz/{id}",
    tag = QUIZ_TAG,
    params(("id" = i32, Path, description = "Quiz ID")),
    request_body = UpdateQuizDto,
    responses(
        (status = 200, description = "Quiz updated", body = QuizDto),
        (status = 403, description = "Not the quiz author", body = ErrorDto),
        (status = 404, description = "Quiz not found", body = ErrorDto)
    ),
)]
pub async fn update_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuizDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    let quiz = QuizService::new(&state.db)
        .update(&user, id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(quiz.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/quiz/{id}",
    tag = QUIZ_TAG,
    params(("id" = i32, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz deleted", body = MessageDto),
        (status = 403, description = "Not the quiz author", body = ErrorDto),
        (status = 404, description = "Quiz not found", body = ErrorDto)
    ),
)]
pub async fn delete_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[Permission::Roles(INSTRUCTOR_OR_ADMIN)])
        .await?;

    QuizService::new(&state.db).delete(&user, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Quiz deleted"))))
}

/// Submit answers and get the graded result.
///
/// Answers match questions by id, position or text, and the selected option by text
/// or index. The attempt is stored and logged.
#[utoipa::path(
    post,
    path = "/api/quiz/{id}/submit",
    tag = QUIZ_TAG,
    params(("id" = i32, Path, description = "Quiz ID")),
    request_body = SubmitQuizDto,
    responses(
        (status = 200, description = "Graded result", body = QuizResultDto),
        (status = 404, description = "Quiz not found", body = ErrorDto)
    ),
)]
pub async fn submit_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitQuizDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.tokens, &headers)
        .require(&[])
        .await?;

    let grade = QuizService::new(&state.db)
        .submit(user.id, id, &payload.answers)
        .await?;

    Ok((StatusCode::OK, Json(grade.into_dto())))
}

//! `AppError` and its HTTP rendering.
//!
//! Handlers return `Result<_, AppError>` and let `?` lift repository, client and auth
//! failures into it. Every error body has the shape `{ "message": string }`; server-side
//! failures are logged and answered with a generic message.

pub mod auth;
pub mod config;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError},
};

/// Every failure a request can end in.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed environment configuration.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization error.
    ///
    /// Delegates to `AuthError::into_response()` for 401 / 403 mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// 500, details logged.
    ///
    /// Unique key violations never land here; `From<DbErr>` turns them into
    /// `BadRequest`.
    #[error(transparent)]
    DbErr(sea_orm::DbErr),

    /// An outbound call failed and the caller has no fallback for it.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Token signing error.
    #[error(transparent)]
    JwtErr(#[from] jsonwebtoken::errors::Error),

    /// Socket or file IO error.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// 404 with the message.
    #[error("{0}")]
    NotFound(String),

    /// 400 with the message.
    #[error("{0}")]
    BadRequest(String),

    /// Invalid request error carrying extra fields merged into the body next to `message`.
    ///
    /// Used where clients rely on additional context, such as the id of an existing
    /// enrollment when a duplicate is rejected.
    #[error("{message}")]
    BadRequestWith {
        message: String,
        extra: serde_json::Value,
    },

    /// Caller is authenticated but may not touch this resource.
    ///
    /// Results in 403 Forbidden with the provided error message.
    #[error("{0}")]
    Forbidden(String),

    /// 500; the message is logged, never sent.
    #[error("{0}")]
    InternalError(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::BadRequest(duplicate_message(&detail))
            }
            _ => Self::DbErr(err),
        }
    }
}

/// Names the conflicting columns of a unique constraint failure.
///
/// SQLite reports `UNIQUE constraint failed: payment.transaction_id`; other drivers
/// fall back to a generic message.
fn duplicate_message(detail: &str) -> String {
    let Some((_, columns)) = detail.split_once("constraint failed: ") else {
        return "A record with these values already exists".to_string();
    };

    let columns: Vec<&str> = columns
        .split(',')
        .map(|c| c.trim())
        .map(|c| c.rsplit_once('.').map_or(c, |(_, column)| column))
        .collect();

    format!("Duplicate value for {}", columns.join(", "))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorDto { message: msg })).into_response()
            }
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto { message: msg })).into_response()
            }
            Self::BadRequestWith { message, extra } => {
                let mut body = match extra {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                body.insert("message".to_string(), serde_json::Value::String(message));

                (StatusCode::BAD_REQUEST, Json(serde_json::Value::Object(body))).into_response()
            }
            Self::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, Json(ErrorDto { message: msg })).into_response()
            }
            Self::InternalError(msg) => InternalServerError(msg).into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Logs the wrapped error and answers 500 with a generic message.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                message: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_single_column() {
        assert_eq!(
            duplicate_message("UNIQUE constraint failed: payment.transaction_id"),
            "Duplicate value for transaction_id"
        );
    }

    #[test]
    fn names_composite_columns() {
        assert_eq!(
            duplicate_message("UNIQUE constraint failed: enrollment.student_id, enrollment.course_id"),
            "Duplicate value for student_id, course_id"
        );
    }

    #[test]
    fn generic_message_for_other_drivers() {
        assert_eq!(
            duplicate_message("duplicate key value violates unique constraint \"idx\""),
            "A record with these values already exists"
        );
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The `Authorization` header is absent or is not a `Bearer` token.
    #[error("No token provided")]
    MissingToken,

    /// The bearer token failed signature or expiry verification.
    #[error("Authentication failed")]
    InvalidToken,

    /// The token references a user that no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Unknown email or wrong password at login.
    ///
    /// Both cases share one message so callers cannot tell which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The caller's stored role is not in the route's allow-list.
    #[error("User role '{0}' is not authorized to access this route")]
    RoleNotAllowed(String),

    /// A sub-admin lacks the named capability.
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    /// A capability-gated route was hit by a role that can never hold capabilities.
    #[error("Insufficient role for this operation")]
    InsufficientRole,

    /// The caller does not own the resource they tried to reach.
    #[error("{0}")]
    AccessDenied(String),
}

/// Converts authentication errors into HTTP responses.
///
/// # Returns
/// - 401 Unauthorized - Missing or invalid token, deleted user, bad credentials
/// - 403 Forbidden - Role, capability or ownership checks failed
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingToken
            | Self::InvalidToken
            | Self::UserNotFound
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::RoleNotAllowed(_)
            | Self::MissingPermission(_)
            | Self::InsufficientRole
            | Self::AccessDenied(_) => StatusCode::FORBIDDEN,
        };

        tracing::debug!("Auth rejected: {}", self);

        (
            status,
            Json(ErrorDto {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

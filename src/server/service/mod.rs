//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating multiple repository calls and external services
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//! - **Transaction Management**: Running compound writes in one database transaction

pub mod achievement;
pub mod activity;
pub mod admin;
pub mod ai_gateway;
pub mod ai_tutor;
pub mod assignment;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod flag;
pub mod instructor;
pub mod lesson;
pub mod mailer;
pub mod media;
pub mod parent;
pub mod payment;
pub mod progress;
pub mod quiz;
pub mod student;
pub mod token;
pub mod user;

#[cfg(test)]
mod test;

use crate::server::{
    error::{auth::AuthError, AppError},
    model::user::User,
};

/// Highest 1-based page number honoured by paginated listings.
///
/// Larger requested pages are clamped so offsets stay within the database's integer range.
pub(crate) const MAX_PAGE: u64 = 100_000;

/// Allows the owner of a resource or an admin through.
///
/// # Arguments
/// - `actor` - Authenticated caller
/// - `owner_id` - User that owns the resource
/// - `message` - 403 message when the check fails
pub(crate) fn ensure_owner(actor: &User, owner_id: i32, message: &str) -> Result<(), AppError> {
    if actor.id == owner_id || actor.is_admin() {
        return Ok(());
    }

    Err(AuthError::AccessDenied(message.to_string()).into())
}

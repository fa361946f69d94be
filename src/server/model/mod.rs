//! Server-side domain models and parameter types.
//!
//! This module contains domain models used throughout the service layer, representing
//! business entities and operation parameters. Domain models are converted from entity
//! models at the repository boundary and transformed to DTOs at the controller boundary.
//! They provide type-safe representations with business logic separated from database
//! and API concerns.

pub mod achievement;
pub mod activity;
pub mod admin;
pub mod ai;
pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod flag;
pub mod lesson;
pub mod payment;
pub mod progress;
pub mod quiz;
pub mod user;
pub mod user_course;

use sea_orm::ActiveEnum;

use crate::server::error::AppError;

/// Returns the stored string form of a string-backed enum, e.g. `"sub-admin"`.
pub fn enum_name<E>(value: &E) -> String
where
    E: ActiveEnum<Value = String>,
{
    value.to_value()
}

/// Parses a request string into a string-backed enum.
///
/// # Arguments
/// - `field` - Name of the request field, used in the error message
/// - `raw` - Value sent by the client
///
/// # Returns
/// - `Ok(E)` - Matching enum variant
/// - `Err(AppError::BadRequest)` - No variant is stored as `raw`
pub fn parse_enum<E>(field: &str, raw: &str) -> Result<E, AppError>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", field, raw)))
}

/// Parses an optional request string, passing `None` through.
pub fn parse_optional_enum<E>(field: &str, raw: Option<String>) -> Result<Option<E>, AppError>
where
    E: ActiveEnum<Value = String>,
{
    raw.map(|value| parse_enum(field, &value)).transpose()
}

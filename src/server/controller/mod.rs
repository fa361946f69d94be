//! HTTP handlers, one module per route tree under `/api`.
//!
//! Handlers authenticate through [`AuthGuard`](crate::server::middleware::auth::AuthGuard),
//! convert request DTOs into service params and map domain models back to DTOs.

use entity::sea_orm_active_enums::Role;

pub mod achievement;
pub mod admin;
pub mod ai;
pub mod assignment;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod flag;
pub mod instructor;
pub mod lesson;
pub mod parent;
pub mod payment;
pub mod progress;
pub mod quiz;
pub mod student;
pub mod user;

/// Roles allowed to author course content.
pub(crate) const INSTRUCTOR_OR_ADMIN: &[Role] = &[Role::Instructor, Role::Admin];

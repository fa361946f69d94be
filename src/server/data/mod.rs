//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to keep the data layer separate from business logic. Every repository is
//! generic over `ConnectionTrait`, so the same code runs on a pooled connection or inside
//! a transaction opened by a service.

pub mod achievement;
pub mod activity_log;
pub mod ai_interaction;
pub mod announcement;
pub mod assignment;
pub mod course;
pub mod course_review;
pub mod enrollment;
pub mod event;
pub mod feature_flag;
pub mod lesson;
pub mod parent_child;
pub mod payment;
pub mod quiz;
pub mod user;
pub mod user_course;

#[cfg(test)]
mod test;

//! Request and response bodies exchanged with API clients.
//!
//! Every type here is a plain serde DTO with an OpenAPI schema. Field names follow the
//! camelCase convention of the web client, and record ids are serialized as `_id`.

pub mod achievement;
pub mod admin;
pub mod ai;
pub mod api;
pub mod assignment;
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

//! KavyaLearn HTTP backend.
//!
//! Requests enter through `router`, which applies CORS, per-IP rate limits and request
//! tracing before dispatching to a controller. Controllers authenticate the caller with
//! the bearer-token guard in `middleware`, turn request DTOs into parameter types and
//! call a service. Services own the learning rules (enrollment activation, lesson
//! completion, grading, achievements) and talk to storage only through the repositories
//! in `data`, which map SeaORM entities to the domain types in `model`.
//!
//! Outbound integrations (AI providers, SendGrid, Cloudinary) live in `service` as small
//! client handles built once in `startup` and shared through `state`.
//!
//! Failures at any layer surface as `error::AppError`, which renders the JSON error body
//! and status code.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;

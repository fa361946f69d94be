use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::user::User,
    service::{mailer::Mailer, token::TokenService},
};

mod admin;
mod auth;
mod course;
mod enrollment;
mod event;
mod flag;
mod flow;
mod lesson_completion;
mod parent;
mod payment;
mod progress;
mod quiz;

const SECRET: &str = "service-test-secret";

fn tokens() -> TokenService {
    TokenService::new(SECRET)
}

/// Mailer without an API key; sends are skipped.
fn mailer() -> Mailer {
    Mailer::new(reqwest::Client::new(), None, "noreply@kavyalearn.test".to_string())
}

/// Loads the domain user for a factory-created row.
async fn load_user(db: &DatabaseConnection, id: i32) -> Result<User, AppError> {
    UserRepository::new(db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

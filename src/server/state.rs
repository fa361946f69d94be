//! Application state shared across all request handlers.
//!
//! The state is built once in `startup` and cloned into every handler through Axum's
//! state extraction. Every field is cheap to clone: the connection pool and the HTTP
//! client share their internals, and the service handles only hold keys and clients.

use sea_orm::DatabaseConnection;

use crate::server::service::{
    ai_gateway::AiGateway, mailer::Mailer, media::MediaStore, token::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    /// Connection pool for the application database.
    pub db: DatabaseConnection,

    /// Shared client for outbound requests (AI providers, email, image storage).
    pub http_client: reqwest::Client,

    /// Signs and verifies bearer tokens.
    pub tokens: TokenService,

    /// Chat proxy for the OpenAI and Claude providers.
    pub ai: AiGateway,

    pub mailer: Mailer,

    /// Profile photo storage.
    pub media: MediaStore,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        tokens: TokenService,
        ai: AiGateway,
        mailer: Mailer,
        media: MediaStore,
    ) -> Self {
        Self {
            db,
            http_client,
            tokens,
            ai,
            mailer,
            media,
        }
    }
}

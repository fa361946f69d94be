use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::server::{
    config::Config,
    error::AppError,
    service::{
        ai_gateway::AiGateway, mailer::Mailer, media::MediaStore, token::TokenService,
    },
    state::AppState,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Installs the global tracing subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool using the connection string from configuration, then
/// runs all pending SeaORM migrations so the schema is up to date before the server
/// accepts requests.
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the shared outbound HTTP client.
///
/// Redirects are disabled so provider URLs taken from configuration cannot bounce
/// requests to other hosts.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()?)
}

/// Wires the service handles that live for the whole process.
pub fn build_state(config: &Config, db: DatabaseConnection, http_client: reqwest::Client) -> AppState {
    let tokens = TokenService::new(&config.jwt_secret);
    let ai = AiGateway::new(http_client.clone(), config);
    let mailer = Mailer::new(
        http_client.clone(),
        config.sendgrid_api_key.clone(),
        config.from_email.clone(),
    );
    let media = MediaStore::new(
        http_client.clone(),
        config.cloudinary_cloud_name.clone(),
        config.cloudinary_upload_preset.clone(),
    );

    if !mailer.is_configured() {
        tracing::warn!("SENDGRID_API_KEY not set, welcome emails are disabled");
    }

    AppState::new(db, http_client, tokens, ai, mailer, media)
}

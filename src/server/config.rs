use url::Url;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_FROM_EMAIL: &str = "no-reply@kavyalearn.com";
const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,

    pub allowed_origins: Vec<String>,
    pub allow_all_origins: bool,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub claude_enabled: bool,
    pub claude_api_key: Option<String>,
    pub claude_api_url: String,

    pub sendgrid_api_key: Option<String>,
    pub from_email: String,

    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_upload_preset: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match optional("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvVar {
                name: "PORT".to_string(),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            port,
            allowed_origins: allowed_origins(
                optional("FRONTEND_URL").or_else(|| optional("FRONTEND_URLS")),
            ),
            allow_all_origins: flag("ALLOW_ALL_ORIGINS"),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            claude_enabled: flag("CLAUDE_HAIKU_ENABLED"),
            claude_api_key: optional("CLAUDE_API_KEY"),
            claude_api_url: http_url("CLAUDE_API_URL", DEFAULT_CLAUDE_API_URL)?,
            sendgrid_api_key: optional("SENDGRID_API_KEY"),
            from_email: optional("FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            cloudinary_cloud_name: optional("CLOUDINARY_CLOUD_NAME"),
            cloudinary_upload_preset: optional("CLOUDINARY_UPLOAD_PRESET"),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads a variable, treating an empty value as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads an absolute http(s) URL, falling back to `default` when unset.
fn http_url(name: &str, default: &str) -> Result<String, ConfigError> {
    let Some(value) = optional(name) else {
        return Ok(default.to_string());
    };

    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
    }
}

fn flag(name: &str) -> bool {
    optional(name).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Comma separated frontend origins followed by the local dev servers.
fn allowed_origins(frontend: Option<String>) -> Vec<String> {
    let mut origins: Vec<String> = frontend
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    for dev in DEV_ORIGINS {
        if !origins.iter().any(|o| o == dev) {
            origins.push(dev.to_string());
        }
    }

    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_frontend_urls_and_appends_dev_origins() {
        let origins = allowed_origins(Some(
            "https://kavyalearn.com, https://admin.kavyalearn.com,".to_string(),
        ));

        assert_eq!(
            origins,
            vec![
                "https://kavyalearn.com",
                "https://admin.kavyalearn.com",
                "http://localhost:5173",
                "http://localhost:5174",
            ]
        );
    }

    #[test]
    fn dev_origins_are_not_duplicated() {
        let origins = allowed_origins(Some("http://localhost:5173".to_string()));

        assert_eq!(origins, vec!["http://localhost:5173", "http://localhost:5174"]);
    }
}

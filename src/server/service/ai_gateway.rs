//! Proxy to third-party chat models.
//!
//! Models whose name starts with `claude` go to the Anthropic messages endpoint, every
//! other model goes to OpenAI chat completions. Missing keys and provider failures never
//! surface as errors: the caller receives a demo reply instead. The only hard failure is
//! asking for a Claude model while Claude is disabled.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::{config::Config, error::AppError, model::ai::ChatProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(20);

/// A single-turn chat request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Clone)]
pub struct AiGateway {
    http_client: reqwest::Client,
    openai_api_key: Option<String>,
    openai_model: String,
    claude_enabled: bool,
    claude_api_key: Option<String>,
    claude_api_url: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiMessage>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

impl AiGateway {
    pub fn new(http_client: reqwest::Client, config: &Config) -> Self {
        Self {
            http_client,
            openai_api_key: config.openai_api_key.clone(),
            openai_model: config.openai_model.clone(),
            claude_enabled: config.claude_enabled,
            claude_api_key: config.claude_api_key.clone(),
            claude_api_url: config.claude_api_url.clone(),
        }
    }

    /// Sends one message to the provider selected by the model name.
    ///
    /// # Returns
    /// - `Ok(String)` - Provider reply, or a demo reply when the provider is unavailable
    /// - `Err(AppError::Forbidden)` - A Claude model was requested while Claude is disabled
    pub async fn chat(&self, request: ChatRequest) -> Result<String, AppError> {
        match ChatProvider::for_model(request.model.as_deref()) {
            ChatProvider::Claude => self.chat_claude(request).await,
            ChatProvider::OpenAi => Ok(self.chat_openai(request).await),
        }
    }

    async fn chat_claude(&self, request: ChatRequest) -> Result<String, AppError> {
        if !self.claude_enabled {
            return Err(AppError::Forbidden(
                "Requested model is not enabled on server".to_string(),
            ));
        }
        let Some(api_key) = self.claude_api_key.as_deref() else {
            return Ok(format!(
                "Demo reply (Claude key not configured). You asked: \"{}\"",
                request.message
            ));
        };

        let body = json!({
            "model": request.model.as_deref().unwrap_or(DEFAULT_CLAUDE_MODEL),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "messages": [{ "role": "user", "content": request.message }],
        });

        let response = async {
            self.http_client
                .post(&self.claude_api_url)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .timeout(PROVIDER_TIMEOUT)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await
        }
        .await;

        match response {
            Ok(value) => Ok(claude_reply_text(&value)
                .unwrap_or_else(|| "(no reply from Claude)".to_string())),
            Err(e) => {
                tracing::warn!("Claude request failed: {}", e);
                Ok(format!(
                    "Sorry, the Claude AI service is temporarily unavailable. Demo reply: you asked \"{}\".",
                    request.message
                ))
            }
        }
    }

    async fn chat_openai(&self, request: ChatRequest) -> String {
        let Some(api_key) = self.openai_api_key.as_deref() else {
            return format!(
                "Demo reply (OpenAI key not configured). You asked: \"{}\"",
                request.message
            );
        };

        let body = json!({
            "model": request.model.as_deref().unwrap_or(&self.openai_model),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "messages": [{ "role": "user", "content": request.message }],
        });

        let response = async {
            self.http_client
                .post(OPENAI_URL)
                .bearer_auth(api_key)
                .timeout(PROVIDER_TIMEOUT)
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json::<OpenAiResponse>()
                .await
        }
        .await;

        match response {
            Ok(parsed) => parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .unwrap_or_else(|| "(no reply from AI)".to_string()),
            Err(e) => {
                tracing::warn!("OpenAI request failed: {}", e);
                format!(
                    "Sorry, the AI service is temporarily unavailable. Demo reply: you asked \"{}\".",
                    request.message
                )
            }
        }
    }
}

/// Text of the first content block, falling back to the legacy `completion` field.
fn claude_reply_text(value: &Value) -> Option<String> {
    value
        .get("content")
        .and_then(|c| c.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .or_else(|| value.get("completion").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(claude_enabled: bool) -> AiGateway {
        AiGateway {
            http_client: reqwest::Client::new(),
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            claude_enabled,
            claude_api_key: None,
            claude_api_url: "http://127.0.0.1:9/v1/messages".to_string(),
        }
    }

    fn request(model: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: "What is ownership?".to_string(),
            model: model.map(str::to_string),
            max_tokens: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn disabled_claude_is_forbidden() {
        let result = gateway(false).chat(request(Some("claude-haiku"))).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn claude_without_key_returns_demo_reply() {
        let reply = gateway(true).chat(request(Some("claude-haiku"))).await.unwrap();

        assert_eq!(
            reply,
            "Demo reply (Claude key not configured). You asked: \"What is ownership?\""
        );
    }

    #[tokio::test]
    async fn openai_without_key_returns_demo_reply() {
        let reply = gateway(false).chat(request(None)).await.unwrap();

        assert!(reply.starts_with("Demo reply (OpenAI key not configured)"));
    }

    #[tokio::test]
    async fn unreachable_claude_falls_back_to_demo_reply() {
        let mut gateway = gateway(true);
        gateway.claude_api_key = Some("key".to_string());

        let reply = gateway.chat(request(Some("claude-haiku"))).await.unwrap();

        assert!(reply.contains("temporarily unavailable"));
    }

    #[test]
    fn claude_reply_prefers_content_blocks() {
        let value = json!({ "content": [{ "type": "text", "text": "hi" }] });
        assert_eq!(claude_reply_text(&value).as_deref(), Some("hi"));

        let legacy = json!({ "completion": "old" });
        assert_eq!(claude_reply_text(&legacy).as_deref(), Some("old"));

        assert_eq!(claude_reply_text(&json!({})), None);
    }
}

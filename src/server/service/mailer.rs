//! Outbound email through the SendGrid v3 API.
//!
//! Delivery is best effort: failures are logged and never surface to the caller.

use serde_json::json;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Clone)]
pub struct Mailer {
    http_client: reqwest::Client,
    api_key: Option<String>,
    from_email: String,
}

impl Mailer {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, from_email: String) -> Self {
        Self {
            http_client,
            api_key,
            from_email,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends the registration welcome email. No-op when mail is not configured.
    pub async fn send_welcome(&self, to: &str, full_name: &str) {
        let text = format!("Welcome to KavyaLearn, {}!", full_name);
        let html = format!(
            "<h1>Welcome to KavyaLearn</h1><p>Dear {},</p><p>Thank you for joining KavyaLearn. We're excited to have you on board!</p>",
            full_name
        );

        self.send(to, "Welcome to KavyaLearn", &text, &html).await;
    }

    async fn send(&self, to: &str, subject: &str, text: &str, html: &str) {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("Mail not configured, skipping '{}' to {}", subject, to);
            return;
        };

        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [
                { "type": "text/plain", "value": text },
                { "type": "text/html", "value": html }
            ]
        });

        let result = self
            .http_client
            .post(SENDGRID_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        if let Err(e) = result {
            tracing::warn!("Failed to send '{}' to {}: {}", subject, to, e);
        }
    }
}

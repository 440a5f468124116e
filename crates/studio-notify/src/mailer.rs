//! Mailer trait and HTTP provider client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::NotifyError;

/// An outbound email
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl EmailMessage {
    fn validate(&self) -> Result<(), NotifyError> {
        if self.to.is_empty() || !self.to.contains('@') {
            return Err(NotifyError::InvalidMessage(format!(
                "invalid recipient '{}'",
                self.to
            )));
        }
        if self.subject.is_empty() {
            return Err(NotifyError::InvalidMessage("empty subject".into()));
        }
        Ok(())
    }
}

/// Provider acknowledgement for a sent message
#[derive(Debug, Clone, Deserialize)]
pub struct SentEmail {
    pub message_id: String,
}

/// Outbound email sender
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single message; returns the provider message ID
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, NotifyError>;
}

/// Email provider configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Provider send endpoint
    pub api_url: String,
    /// Provider API key
    pub api_key: String,
    /// From address stamped on every message
    pub from_address: String,
    /// Studio admin inbox for internal notifications
    pub admin_address: String,
}

/// HTTP email provider client
///
/// Posts JSON to the provider's send endpoint with bearer auth, the same
/// request/response shape the rest of the workspace uses for external HTTP
/// collaborators.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

impl HttpMailer {
    /// Create a new HTTP mailer
    pub fn new(config: MailerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The configured admin inbox
    pub fn admin_address(&self) -> &str {
        &self.config.admin_address
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, NotifyError> {
        message.validate()?;

        debug!(to = %message.to, subject = %message.subject, "Sending email");

        let body = SendRequest {
            from: &self.config.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            html: message.html.as_deref(),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Email provider request failed");
                NotifyError::ProviderError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Email provider error");
            return Err(NotifyError::ProviderError(format!(
                "provider returned {status}"
            )));
        }

        response.json::<SentEmail>().await.map_err(|e| {
            error!(error = %e, "Failed to parse provider response");
            NotifyError::Internal(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_bad_recipient() {
        let msg = EmailMessage {
            to: "not-an-address".into(),
            subject: "hi".into(),
            text: "body".into(),
            html: None,
        };
        assert!(msg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_subject() {
        let msg = EmailMessage {
            to: "jo@example.com".into(),
            subject: String::new(),
            text: "body".into(),
            html: None,
        };
        assert!(msg.validate().is_err());
    }
}

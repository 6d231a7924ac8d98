//! Delivery channels: the provider traits and their HTTP implementations.
//!
//! Providers send exactly one message per call. Fan-out, timeouts and
//! partial-failure handling live in [`crate::dispatch`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::compose::{EmailMessage, SmsMessage};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Email => f.write_str("email"),
            ChannelKind::Sms => f.write_str("sms"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Message build error: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), ChannelError>;
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), ChannelError>;
}

fn http_client() -> Result<Client, ChannelError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

async fn check_status(response: reqwest::Response) -> Result<(), ChannelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let message = response.text().await.unwrap_or_default();
    Err(ChannelError::Api {
        status: status.as_u16(),
        message,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Email over an EmailJS-style REST API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEmailConfig {
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Clone)]
pub struct HttpEmailProvider {
    client: Client,
    config: HttpEmailConfig,
}

impl HttpEmailProvider {
    pub fn new(config: HttpEmailConfig) -> Result<Self, ChannelError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }
}

#[async_trait]
impl EmailProvider for HttpEmailProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), ChannelError> {
        let body = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "accessToken": self.config.access_token,
            "template_params": {
                "to_email": message.to,
                "reply_to": message.reply_to,
                "subject": message.subject,
                "message": message.body,
                "priority": if message.urgent { "urgent" } else { "normal" },
            },
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        debug!(to = %message.to, "email accepted by provider");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SMS over a bearer-authenticated JSON API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSmsConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    to: &'a str,
    from: &'a str,
    message: &'a str,
    urgent: bool,
}

#[derive(Clone)]
pub struct HttpSmsProvider {
    client: Client,
    config: HttpSmsConfig,
}

impl HttpSmsProvider {
    pub fn new(config: HttpSmsConfig) -> Result<Self, ChannelError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }
}

#[async_trait]
impl SmsProvider for HttpSmsProvider {
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&SmsRequest {
                to: &message.to,
                from: &message.sender_id,
                message: &message.body,
                urgent: message.urgent,
            })
            .send()
            .await?;
        check_status(response).await?;

        debug!(to = %message.to, "sms accepted by provider");
        Ok(())
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use contact_core::channel::{HttpEmailConfig, HttpSmsConfig};
use contact_core::DispatchSettings;

use crate::mailer::SmtpConfig;

/// Which transport carries staff notification emails.
#[derive(Debug, Clone)]
pub enum EmailBackend {
    Smtp(SmtpConfig),
    Http(HttpEmailConfig),
    Disabled,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub contact_log_path: PathBuf,
    pub email_recipients: Vec<String>,
    pub sms_recipients: Vec<String>,
    pub sms_sender_id: String,
    pub sms_api: Option<HttpSmsConfig>,
    pub email_backend: EmailBackend,
    pub notify_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let email_recipients = split_list(&require_env("NOTIFY_EMAIL_RECIPIENTS")?);
        if email_recipients.is_empty() {
            anyhow::bail!("NOTIFY_EMAIL_RECIPIENTS must list at least one address");
        }

        let sms_api = match optional_env("SMS_API_URL") {
            Some(api_url) => Some(HttpSmsConfig {
                api_url,
                api_key: require_env("SMS_API_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://contacts.db?mode=rwc".to_string()),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            contact_log_path: optional_env("CONTACT_LOG_PATH")
                .unwrap_or_else(|| "logs/contacts.log".to_string())
                .into(),
            email_recipients,
            sms_recipients: optional_env("NOTIFY_SMS_RECIPIENTS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            sms_sender_id: optional_env("SMS_SENDER_ID").unwrap_or_else(|| "CONTACT".to_string()),
            sms_api,
            email_backend: email_backend_from_env()?,
            notify_timeout: Duration::from_secs(
                optional_env("NOTIFY_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse::<u64>()
                    .context("NOTIFY_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            email_enabled: !matches!(self.email_backend, EmailBackend::Disabled),
            sms_enabled: self.sms_api.is_some() && !self.sms_recipients.is_empty(),
            email_recipients: self.email_recipients.clone(),
            sms_recipients: self.sms_recipients.clone(),
            sms_sender_id: self.sms_sender_id.clone(),
            call_timeout: self.notify_timeout,
        }
    }
}

fn email_backend_from_env() -> Result<EmailBackend> {
    if let Some(host) = optional_env("SMTP_HOST") {
        return Ok(EmailBackend::Smtp(SmtpConfig {
            host,
            port: optional_env("SMTP_PORT")
                .unwrap_or_else(|| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            username: optional_env("SMTP_USERNAME").unwrap_or_default(),
            password: optional_env("SMTP_PASSWORD").unwrap_or_default(),
            from_address: optional_env("MAIL_FROM")
                .unwrap_or_else(|| "noreply@localhost".to_string()),
        }));
    }

    if let Some(api_url) = optional_env("EMAIL_API_URL") {
        return Ok(EmailBackend::Http(HttpEmailConfig {
            api_url,
            service_id: require_env("EMAIL_SERVICE_ID")?,
            template_id: require_env("EMAIL_TEMPLATE_ID")?,
            public_key: require_env("EMAIL_PUBLIC_KEY")?,
            access_token: optional_env("EMAIL_ACCESS_TOKEN"),
        }));
    }

    Ok(EmailBackend::Disabled)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Comma-separated list, blanks dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

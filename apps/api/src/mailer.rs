//! Staff notification email over SMTP (lettre).

use async_trait::async_trait;
use contact_core::compose::EmailMessage;
use contact_core::{ChannelError, EmailProvider};
use lettre::{
    message::{
        header::{self, Header, HeaderName, HeaderValue},
        Mailbox,
    },
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

/// `X-Priority` mail header: 1 for urgent, 3 for normal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct XPriority(u8);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.trim().parse()?))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = if config.username.is_empty() || config.password.is_empty() {
            tracing::info!(
                smtp_host = %config.host,
                smtp_port = config.port,
                "SMTP credentials not configured, using unauthenticated connection"
            );
            SmtpTransport::builder_dangerous(&config.host)
                .port(config.port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.host,
                smtp_port = config.port,
                from = %config.from_address,
                "SMTP mailer initialized with authentication and TLS"
            );
            let creds = Credentials::new(config.username.clone(), config.password.clone());
            SmtpTransport::relay(&config.host)?
                .port(config.port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from: config.from_address.parse()?,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ChannelError> {
    address
        .parse()
        .map_err(|e| ChannelError::Address(format!("{address}: {e}")))
}

fn build_message(from: &Mailbox, message: &EmailMessage) -> Result<Message, ChannelError> {
    Message::builder()
        .from(from.clone())
        .reply_to(parse_mailbox(&message.reply_to)?)
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.clone())
        .header(XPriority(if message.urgent { 1 } else { 3 }))
        .header(header::ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| ChannelError::Build(e.to_string()))
}

#[async_trait]
impl EmailProvider for SmtpMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), ChannelError> {
        let email = build_message(&self.from, message)?;
        let transport = self.transport.clone();

        tracing::info!(to = %message.to, subject = %message.subject, "Sending email");

        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        Ok(())
    }
}

mod config;
mod contact;
mod db;
mod errors;
mod mailer;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use contact_core::channel::{HttpEmailProvider, HttpSmsProvider};
use contact_core::{Dispatcher, EmailProvider, SmsProvider};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmailBackend};
use crate::contact::journal::ContactLog;
use crate::db::create_pool;
use crate::mailer::SmtpMailer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("contact_api={0},contact_core={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting contact API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let dispatcher = build_dispatcher(&config)?;
    info!(
        email = dispatcher.email_available(),
        sms = dispatcher.sms_available(),
        email_recipients = config.email_recipients.len(),
        sms_recipients = config.sms_recipients.len(),
        "Notification channels configured"
    );

    let contact_log = ContactLog::new(config.contact_log_path.clone());
    info!("Contact log at {}", contact_log.path().display());

    let state = AppState {
        db,
        dispatcher,
        contact_log,
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Wires the configured email and SMS providers into a dispatcher.
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let email: Option<Arc<dyn EmailProvider>> = match &config.email_backend {
        EmailBackend::Smtp(smtp) => Some(Arc::new(SmtpMailer::new(smtp)?)),
        EmailBackend::Http(http) => Some(Arc::new(HttpEmailProvider::new(http.clone())?)),
        EmailBackend::Disabled => {
            warn!("No email transport configured; staff emails are disabled");
            None
        }
    };

    let sms: Option<Arc<dyn SmsProvider>> = match &config.sms_api {
        Some(api) => Some(Arc::new(HttpSmsProvider::new(api.clone())?)),
        None => {
            warn!("SMS_API_URL not set; urgent SMS alerts are disabled");
            None
        }
    };

    Ok(Dispatcher::new(email, sms, config.dispatch_settings()))
}

//! Delivery paths available to the controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use contact_core::compose::Receipt;
use contact_core::{DispatchReport, DispatchSettings, Dispatcher, EmailProvider, SmsProvider, Submission};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::controller::Capabilities;

const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(30);

/// What a successful delivery looked like.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum Delivery {
    Direct {
        report: DispatchReport,
    },
    Endpoint {
        contact_id: i64,
        email: bool,
        sms: bool,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint rejected submission (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected endpoint response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("All delivery channels failed")]
    TotalDeliveryFailure(DispatchReport),
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn deliver(&self, submission: &Submission, urgent: bool) -> Result<Delivery, TransportError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Direct dispatch to the providers
// ────────────────────────────────────────────────────────────────────────────

pub struct DirectTransport {
    dispatcher: Dispatcher,
}

impl DirectTransport {
    /// The SMS provider is dropped unless the capabilities allow urgent SMS.
    pub fn new(
        email: Option<Arc<dyn EmailProvider>>,
        sms: Option<Arc<dyn SmsProvider>>,
        settings: DispatchSettings,
        capabilities: Capabilities,
    ) -> Self {
        let sms = sms.filter(|_| capabilities.sms_enabled());
        Self {
            dispatcher: Dispatcher::new(email, sms, settings),
        }
    }
}

#[async_trait]
impl SubmissionTransport for DirectTransport {
    async fn deliver(&self, submission: &Submission, urgent: bool) -> Result<Delivery, TransportError> {
        let receipt = Receipt {
            contact_id: None,
            received_at: Utc::now(),
            remote_ip: None,
        };
        let report = self.dispatcher.dispatch(submission, urgent, &receipt).await;

        if report.total_failure() {
            return Err(TransportError::TotalDeliveryFailure(report));
        }
        Ok(Delivery::Direct { report })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// POST to the submission endpoint
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EndpointNotifications {
    email: bool,
    sms: bool,
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    success: bool,
    #[serde(default)]
    message: String,
    contact_id: Option<i64>,
    notifications: Option<EndpointNotifications>,
}

#[derive(Clone)]
pub struct EndpointTransport {
    client: Client,
    url: String,
}

impl EndpointTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().timeout(ENDPOINT_TIMEOUT).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SubmissionTransport for EndpointTransport {
    async fn deliver(&self, submission: &Submission, _urgent: bool) -> Result<Delivery, TransportError> {
        let response = self.client.post(&self.url).json(submission).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "endpoint answered");
        interpret_response(status, &body)
    }
}

fn interpret_response(status: StatusCode, body: &str) -> Result<Delivery, TransportError> {
    let parsed = serde_json::from_str::<EndpointResponse>(body);

    let response = match parsed {
        Ok(r) if status.is_success() && r.success => r,
        Ok(r) => {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: r.message,
            })
        }
        Err(_) if !status.is_success() => {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: body.to_string(),
            })
        }
        Err(e) => return Err(TransportError::Decode(e)),
    };

    let notifications = response.notifications.unwrap_or(EndpointNotifications {
        email: false,
        sms: false,
    });
    Ok(Delivery::Endpoint {
        contact_id: response.contact_id.unwrap_or_default(),
        email: notifications.email,
        sms: notifications.sms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_core::compose::{EmailMessage, SmsMessage};
    use contact_core::{ChannelError, Priority};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Providers {
        email_fails: bool,
        sms_fails: bool,
        emails: Mutex<usize>,
        sms: Mutex<usize>,
    }

    #[async_trait]
    impl EmailProvider for Providers {
        async fn send_email(&self, _message: &EmailMessage) -> Result<(), ChannelError> {
            *self.emails.lock().unwrap() += 1;
            if self.email_fails {
                return Err(ChannelError::Transport("down".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SmsProvider for Providers {
        async fn send_sms(&self, _message: &SmsMessage) -> Result<(), ChannelError> {
            *self.sms.lock().unwrap() += 1;
            if self.sms_fails {
                return Err(ChannelError::Transport("down".to_string()));
            }
            Ok(())
        }
    }

    fn settings() -> DispatchSettings {
        DispatchSettings {
            email_recipients: vec!["a@site.com".to_string(), "b@site.com".to_string()],
            sms_recipients: vec!["+243000000001".to_string()],
            ..DispatchSettings::default()
        }
    }

    fn submission() -> Submission {
        Submission {
            name: "Jean".to_string(),
            email: "jean@x.com".to_string(),
            phone: None,
            company: None,
            subject: "Fuite".to_string(),
            message: "urgent".to_string(),
            priority: Priority::Normal,
            newsletter: false,
            page_url: None,
        }
    }

    #[tokio::test]
    async fn test_single_channel_never_sends_sms() {
        let providers = Arc::new(Providers::default());
        let transport = DirectTransport::new(
            Some(providers.clone()),
            Some(providers.clone()),
            settings(),
            Capabilities::single_channel(),
        );

        let delivery = transport.deliver(&submission(), true).await.unwrap();

        match delivery {
            Delivery::Direct { report } => {
                assert!(report.email_attempted());
                assert!(!report.sms_attempted());
            }
            other => panic!("unexpected delivery {other:?}"),
        }
        assert_eq!(*providers.emails.lock().unwrap(), 2);
        assert_eq!(*providers.sms.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_multi_channel_urgent_sends_sms() {
        let providers = Arc::new(Providers::default());
        let transport = DirectTransport::new(
            Some(providers.clone()),
            Some(providers.clone()),
            settings(),
            Capabilities::multi_channel(),
        );

        transport.deliver(&submission(), true).await.unwrap();

        assert_eq!(*providers.sms.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sms_success_rescues_failed_email() {
        let providers = Arc::new(Providers {
            email_fails: true,
            ..Providers::default()
        });
        let transport = DirectTransport::new(
            Some(providers.clone()),
            Some(providers.clone()),
            settings(),
            Capabilities::multi_channel(),
        );

        assert!(transport.deliver(&submission(), true).await.is_ok());
    }

    #[tokio::test]
    async fn test_every_channel_failing_is_total_failure() {
        let providers = Arc::new(Providers {
            email_fails: true,
            sms_fails: true,
            ..Providers::default()
        });
        let transport = DirectTransport::new(
            Some(providers.clone()),
            Some(providers.clone()),
            settings(),
            Capabilities::multi_channel(),
        );

        let err = transport.deliver(&submission(), true).await.unwrap_err();
        match err {
            TransportError::TotalDeliveryFailure(report) => {
                assert_eq!(report.email.unwrap().failed(), 2);
                assert_eq!(report.sms.unwrap().failed(), 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    /// Serves `/contact` on an ephemeral port, recording each posted body and
    /// answering with a fixed status and JSON envelope.
    async fn endpoint_stub(
        status: axum::http::StatusCode,
        reply: serde_json::Value,
    ) -> (String, Arc<Mutex<Vec<serde_json::Value>>>) {
        use axum::{routing::post, Json, Router};

        let seen: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            "/contact",
            post(move |Json(body): Json<serde_json::Value>| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    recorded.lock().unwrap().push(body);
                    (status, Json(reply))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/contact"), seen)
    }

    #[tokio::test]
    async fn test_endpoint_posts_submission_and_reads_envelope() {
        let (url, seen) = endpoint_stub(
            axum::http::StatusCode::OK,
            serde_json::json!({
                "success": true,
                "message": "ok",
                "contact_id": 41,
                "notifications": {"email": true, "sms": true, "database": true}
            }),
        )
        .await;

        let delivery = EndpointTransport::new(url)
            .unwrap()
            .deliver(&submission(), true)
            .await
            .unwrap();

        assert_eq!(
            delivery,
            Delivery::Endpoint {
                contact_id: 41,
                email: true,
                sms: true
            }
        );
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["name"], "Jean");
        assert_eq!(seen[0]["email"], "jean@x.com");
        assert_eq!(seen[0]["priority"], "normal");
    }

    #[tokio::test]
    async fn test_endpoint_failure_envelope_is_rejected() {
        let (url, _seen) = endpoint_stub(
            axum::http::StatusCode::OK,
            serde_json::json!({"success": false, "message": "An error occurred"}),
        )
        .await;

        let err = EndpointTransport::new(url)
            .unwrap()
            .deliver(&submission(), false)
            .await
            .unwrap_err();

        match err {
            TransportError::Rejected { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "An error occurred");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = EndpointTransport::new(format!("http://{addr}/contact"))
            .unwrap()
            .deliver(&submission(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Http(_)));
    }

    #[test]
    fn test_interpret_success_envelope() {
        let body = r#"{"success":true,"message":"ok","contact_id":12,"notifications":{"email":true,"sms":false,"database":true}}"#;
        let delivery = interpret_response(StatusCode::OK, body).unwrap();
        assert_eq!(
            delivery,
            Delivery::Endpoint {
                contact_id: 12,
                email: true,
                sms: false
            }
        );
    }

    #[test]
    fn test_interpret_failure_envelope() {
        let body = r#"{"success":false,"message":"An error occurred"}"#;
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert!(matches!(err, TransportError::Rejected { status: 500, .. }));
    }

    #[test]
    fn test_interpret_non_json_error_page() {
        let err = interpret_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Rejected { status: 502, .. }));
    }

    #[test]
    fn test_interpret_garbage_success_is_decode_error() {
        let err = interpret_response(StatusCode::OK, "nope").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}

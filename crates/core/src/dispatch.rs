//! Notification fan-out.
//!
//! Every channel fans out to a fixed recipient list. Recipients are sent to
//! concurrently and joined without short-circuiting; a channel succeeds when
//! at least one recipient did not fail. Individual outcomes are kept in the
//! report so callers can log them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::channel::{ChannelError, ChannelKind, EmailProvider, SmsProvider};
use crate::compose::{self, EmailMessage, Receipt, SmsMessage};
use crate::model::Submission;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub email_recipients: Vec<String>,
    pub sms_recipients: Vec<String>,
    pub sms_sender_id: String,
    /// Upper bound for a single provider call.
    pub call_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            email_enabled: true,
            sms_enabled: true,
            email_recipients: Vec::new(),
            sms_recipients: Vec::new(),
            sms_sender_id: "CONTACT".to_string(),
            call_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum RecipientOutcome {
    Delivered,
    /// The call was made but did not settle within the timeout.
    Unconfirmed,
    Failed(String),
}

impl RecipientOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RecipientOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipientResult {
    pub recipient: String,
    pub outcome: RecipientOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelReport {
    pub channel: ChannelKind,
    pub outcomes: Vec<RecipientResult>,
}

impl ChannelReport {
    /// True when any recipient did not fail. An empty recipient list never succeeds.
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().any(|r| !r.outcome.is_failed())
    }

    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| r.outcome == RecipientOutcome::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|r| r.outcome.is_failed()).count()
    }
}

/// Per-channel results of one dispatch. `None` means the channel was not attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchReport {
    pub email: Option<ChannelReport>,
    pub sms: Option<ChannelReport>,
}

impl DispatchReport {
    pub fn email_attempted(&self) -> bool {
        self.email.is_some()
    }

    pub fn sms_attempted(&self) -> bool {
        self.sms.is_some()
    }

    /// Every attempted channel failed, or nothing was attempted at all.
    pub fn total_failure(&self) -> bool {
        [&self.email, &self.sms]
            .into_iter()
            .flatten()
            .all(|report| !report.succeeded())
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    email: Option<Arc<dyn EmailProvider>>,
    sms: Option<Arc<dyn SmsProvider>>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        email: Option<Arc<dyn EmailProvider>>,
        sms: Option<Arc<dyn SmsProvider>>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            email,
            sms,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn email_available(&self) -> bool {
        self.settings.email_enabled && self.email.is_some()
    }

    pub fn sms_available(&self) -> bool {
        self.settings.sms_enabled && self.sms.is_some()
    }

    /// Email always (when available), then SMS only for urgent submissions.
    pub async fn dispatch(
        &self,
        submission: &Submission,
        urgent: bool,
        receipt: &Receipt,
    ) -> DispatchReport {
        let email = if self.email_available() {
            self.send_emails(submission, urgent, receipt).await
        } else {
            None
        };

        let sms = if urgent && self.sms_available() {
            self.send_sms(submission, receipt).await
        } else {
            None
        };

        DispatchReport { email, sms }
    }

    pub async fn send_emails(
        &self,
        submission: &Submission,
        urgent: bool,
        receipt: &Receipt,
    ) -> Option<ChannelReport> {
        let provider = self.email.clone()?;
        let subject = compose::email_subject(submission, urgent);
        let body = compose::email_body(submission, receipt);

        let report = fan_out(
            ChannelKind::Email,
            &self.settings.email_recipients,
            self.settings.call_timeout,
            |to| {
                let provider = provider.clone();
                let message = EmailMessage {
                    to,
                    subject: subject.clone(),
                    body: body.clone(),
                    reply_to: submission.email.clone(),
                    urgent,
                };
                async move { provider.send_email(&message).await }
            },
        )
        .await;

        Some(report)
    }

    pub async fn send_sms(
        &self,
        submission: &Submission,
        receipt: &Receipt,
    ) -> Option<ChannelReport> {
        let provider = self.sms.clone()?;
        let body = compose::sms_body(submission, receipt.received_at);

        let report = fan_out(
            ChannelKind::Sms,
            &self.settings.sms_recipients,
            self.settings.call_timeout,
            |to| {
                let provider = provider.clone();
                let message = SmsMessage {
                    to,
                    sender_id: self.settings.sms_sender_id.clone(),
                    body: body.clone(),
                    urgent: true,
                };
                async move { provider.send_sms(&message).await }
            },
        )
        .await;

        Some(report)
    }
}

async fn fan_out<F, Fut>(
    channel: ChannelKind,
    recipients: &[String],
    timeout: Duration,
    send: F,
) -> ChannelReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), ChannelError>>,
{
    let calls = recipients.iter().map(|recipient| {
        let call = send(recipient.clone());
        async move {
            let outcome = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(())) => RecipientOutcome::Delivered,
                Ok(Err(e)) => {
                    warn!(%channel, %recipient, error = %e, "delivery failed");
                    RecipientOutcome::Failed(e.to_string())
                }
                Err(_) => {
                    warn!(%channel, %recipient, ?timeout, "delivery unconfirmed after timeout");
                    RecipientOutcome::Unconfirmed
                }
            };
            RecipientResult {
                recipient: recipient.clone(),
                outcome,
            }
        }
    });

    let report = ChannelReport {
        channel,
        outcomes: join_all(calls).await,
    };

    info!(
        %channel,
        recipients = recipients.len(),
        delivered = report.delivered(),
        failed = report.failed(),
        "channel dispatch finished"
    );
    report
}

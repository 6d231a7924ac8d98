use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use contact_core::{is_urgent, validate_field, validate_form, ContactForm, Field, ValidationErrors, URGENT_KEYWORDS};
use tracing::{info, warn};

use crate::fallback::{mailto_fallback, PageContext};
use crate::journal::{ContactJournal, JournalEntry};
use crate::transport::{Delivery, SubmissionTransport, TransportError};
use crate::view::{AlertKind, FormView};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! Our team will get back to you shortly.";
pub const ERROR_MESSAGE: &str = "An error occurred. Please try again or contact us directly.";
pub const FALLBACK_MESSAGE: &str = "Redirecting to your email client...";
pub const CONFIRMATION_TOAST: &str = "A confirmation email has been sent to you.";

/// Which channels a deployment of the controller may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub multi_channel: bool,
    pub sms_on_urgent: bool,
}

impl Capabilities {
    /// Email only.
    pub fn single_channel() -> Self {
        Self {
            multi_channel: false,
            sms_on_urgent: false,
        }
    }

    /// Email for everything, SMS on top for urgent submissions.
    pub fn multi_channel() -> Self {
        Self {
            multi_channel: true,
            sms_on_urgent: true,
        }
    }

    pub fn sms_enabled(&self) -> bool {
        self.multi_channel && self.sms_on_urgent
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Address the `mailto:` fallback is addressed to.
    pub fallback_recipient: String,
    pub fallback_delay: Duration,
    pub success_dismiss_normal: Duration,
    pub success_dismiss_urgent: Duration,
    pub error_dismiss: Duration,
    pub warning_dismiss: Duration,
    pub page: PageContext,
    pub submit_label: String,
    pub busy_label: String,
}

impl ControllerConfig {
    pub fn new(fallback_recipient: impl Into<String>) -> Self {
        Self {
            fallback_recipient: fallback_recipient.into(),
            fallback_delay: Duration::from_secs(3),
            success_dismiss_normal: Duration::from_secs(10),
            success_dismiss_urgent: Duration::from_secs(15),
            error_dismiss: Duration::from_secs(10),
            warning_dismiss: Duration::from_secs(15),
            page: PageContext::default(),
            submit_label: "Send message".to_string(),
            busy_label: "Sending...".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing left the page.
    Rejected(ValidationErrors),
    Delivered(Delivery),
    /// Delivery failed and the visitor was sent to their mail client.
    FellBack { error: TransportError, mailto: String },
}

pub struct ContactController<V: FormView> {
    view: V,
    transport: Arc<dyn SubmissionTransport>,
    config: ControllerConfig,
    journal: ContactJournal,
}

impl<V: FormView> ContactController<V> {
    pub fn new(view: V, transport: Arc<dyn SubmissionTransport>, config: ControllerConfig) -> Self {
        Self {
            view,
            transport,
            config,
            journal: ContactJournal::default(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn journal(&self) -> &ContactJournal {
        &self.journal
    }

    /// Re-validates a single field when it loses focus.
    pub fn on_blur(&self, field: Field, value: &str) -> bool {
        match validate_field(field, value) {
            Ok(()) => {
                self.view.clear_field_error(field);
                true
            }
            Err(e) => {
                self.view.show_field_error(field, &e.message);
                false
            }
        }
    }

    pub fn on_input(&self, field: Field) {
        self.view.clear_field_error(field);
    }

    pub async fn submit(&mut self, form: &ContactForm) -> SubmitOutcome {
        let mut submission = match validate_form(form) {
            Ok(s) => s,
            Err(errors) => {
                for field in Field::ALL {
                    match errors.get(field) {
                        Some(e) => self.view.show_field_error(field, &e.message),
                        None => self.view.clear_field_error(field),
                    }
                }
                return SubmitOutcome::Rejected(errors);
            }
        };
        if !self.config.page.page_url.is_empty() {
            submission.page_url = Some(self.config.page.page_url.clone());
        }
        let urgent = is_urgent(&submission, URGENT_KEYWORDS);

        self.view.set_submitting(true, &self.config.busy_label);
        let result = self.transport.deliver(&submission, urgent).await;
        self.view.set_submitting(false, &self.config.submit_label);

        match result {
            Ok(delivery) => {
                info!(urgent, "contact form delivered");
                let dismiss = if urgent {
                    self.config.success_dismiss_urgent
                } else {
                    self.config.success_dismiss_normal
                };
                self.view.show_alert(AlertKind::Success, SUCCESS_MESSAGE, Some(dismiss));
                self.view.reset_form();
                for field in Field::ALL {
                    self.view.clear_field_error(field);
                }

                self.journal.record(JournalEntry {
                    timestamp: Utc::now(),
                    form: form.clone(),
                    urgent,
                    delivery: delivery.clone(),
                });
                self.view.show_toast(AlertKind::Success, CONFIRMATION_TOAST);

                SubmitOutcome::Delivered(delivery)
            }
            Err(error) => {
                warn!(%error, "contact form delivery failed, falling back to mailto");
                self.view
                    .show_alert(AlertKind::Error, ERROR_MESSAGE, Some(self.config.error_dismiss));

                tokio::time::sleep(self.config.fallback_delay).await;

                let mailto = mailto_fallback(
                    &self.config.fallback_recipient,
                    form,
                    &self.config.page,
                    Utc::now(),
                );
                self.view.open_url(&mailto);
                self.view.show_alert(
                    AlertKind::Warning,
                    FALLBACK_MESSAGE,
                    Some(self.config.warning_dismiss),
                );

                SubmitOutcome::FellBack { error, mailto }
            }
        }
    }
}

//! The submission pipeline: persist, notify, journal, answer.

use chrono::Utc;
use contact_core::compose::Receipt;
use contact_core::{is_urgent, Submission, URGENT_KEYWORDS};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::contact::payload::RequestMeta;
use crate::db;
use crate::errors::AppError;
use crate::models::contact::NewContact;
use crate::state::AppState;

pub const ACCEPTED_MESSAGE: &str = "Contact saved and notifications sent";

/// Which side effects were carried out.
///
/// `email` and `sms` report that the channel was *attempted*, not that any
/// message was confirmed delivered; per-recipient outcomes are only logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsAttempted {
    pub email: bool,
    pub sms: bool,
    pub database: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub contact_id: i64,
    pub notifications: NotificationsAttempted,
}

/// Runs the steps after validation strictly in order. Only persistence can
/// fail the request; notification and journal failures are logged.
pub async fn process(
    state: &AppState,
    submission: Submission,
    meta: RequestMeta,
) -> Result<SubmitResponse, AppError> {
    let urgent = is_urgent(&submission, URGENT_KEYWORDS);
    let received_at = Utc::now();

    let contact_id = db::insert_contact(
        &state.db,
        &NewContact {
            submission: &submission,
            ip_address: meta.remote_ip.as_deref(),
            user_agent: meta.user_agent.as_deref(),
            created_at: received_at,
        },
    )
    .await?;
    info!(contact_id, urgent, "contact saved");

    let receipt = Receipt {
        contact_id: Some(contact_id),
        received_at,
        remote_ip: meta.remote_ip,
    };
    let report = state.dispatcher.dispatch(&submission, urgent, &receipt).await;

    if let Err(e) = state.contact_log.append(contact_id, &submission).await {
        warn!(contact_id, error = %e, path = %state.contact_log.path().display(), "contact log write failed");
    }

    Ok(SubmitResponse {
        success: true,
        message: ACCEPTED_MESSAGE.to_string(),
        contact_id,
        notifications: NotificationsAttempted {
            email: report.email_attempted(),
            sms: report.sms_attempted(),
            database: true,
        },
    })
}

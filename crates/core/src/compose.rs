//! Staff-facing notification texts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Submission;

pub const PHONE_PLACEHOLDER: &str = "Not provided";
pub const COMPANY_PLACEHOLDER: &str = "Individual";
const SMS_MESSAGE_PREVIEW: usize = 100;

/// Provider-neutral email, one per recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: String,
    pub urgent: bool,
}

/// Provider-neutral SMS, one per recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmsMessage {
    pub to: String,
    pub sender_id: String,
    pub body: String,
    pub urgent: bool,
}

/// Server-side context known when the notification is composed.
#[derive(Debug, Clone, Default)]
pub struct Receipt {
    pub contact_id: Option<i64>,
    pub received_at: DateTime<Utc>,
    pub remote_ip: Option<String>,
}

pub fn email_subject(submission: &Submission, urgent: bool) -> String {
    if urgent {
        format!("[URGENT] {}", submission.subject)
    } else {
        submission.subject.clone()
    }
}

pub fn email_body(submission: &Submission, receipt: &Receipt) -> String {
    let header = match receipt.contact_id {
        Some(id) => format!("New contact message - Contact ID: {id}"),
        None => "New contact message".to_string(),
    };

    format!(
        "{header}
=================================================

Client information:
-------------------
Name: {name}
Email: {email}
Phone: {phone}
Company: {company}
Priority: {priority}
Newsletter: {newsletter}

Subject: {subject}

Message:
--------
{message}

Metadata:
---------
Date: {date}
IP: {ip}
Page: {page}
",
        name = submission.name,
        email = submission.email,
        phone = submission.phone.as_deref().unwrap_or(PHONE_PLACEHOLDER),
        company = submission.company.as_deref().unwrap_or(COMPANY_PLACEHOLDER),
        priority = submission.priority.as_str(),
        newsletter = if submission.newsletter { "yes" } else { "no" },
        subject = submission.subject,
        message = submission.message,
        date = receipt.received_at.format("%Y-%m-%d %H:%M:%S"),
        ip = receipt.remote_ip.as_deref().unwrap_or("unknown"),
        page = submission.page_url.as_deref().unwrap_or("unknown"),
    )
}

pub fn sms_body(submission: &Submission, received_at: DateTime<Utc>) -> String {
    format!(
        "New contact message:\nFrom: {}\nTel: {}\nSubject: {}\nMessage: {}\nDate: {}",
        submission.name,
        submission.phone.as_deref().unwrap_or(PHONE_PLACEHOLDER),
        submission.subject,
        preview(&submission.message, SMS_MESSAGE_PREVIEW),
        received_at.format("%Y-%m-%d %H:%M"),
    )
}

/// First `limit` characters, with `...` when the text was cut.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

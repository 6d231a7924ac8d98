//! Last-resort `mailto:` link opened when no network path delivered the message.

use chrono::{DateTime, Utc};
use contact_core::compose::{COMPANY_PLACEHOLDER, PHONE_PLACEHOLDER};
use contact_core::{ContactForm, Priority};

pub const DEFAULT_SUBJECT: &str = "Contact from the website";

/// Context the page knows about itself when building the fallback.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub page_url: String,
    pub user_agent: String,
}

/// Builds a pre-filled `mailto:` URL with a human-readable summary of the form.
pub fn mailto_fallback(
    recipient: &str,
    form: &ContactForm,
    page: &PageContext,
    now: DateTime<Utc>,
) -> String {
    let subject = match form.subject.trim() {
        "" => DEFAULT_SUBJECT,
        s => s,
    };

    let body = format!(
        "NEW CONTACT MESSAGE

CLIENT INFORMATION:
-------------------
Name: {name}
Email: {email}
Phone: {phone}
Company: {company}
Priority: {priority}

MESSAGE:
--------
{message}

METADATA:
---------
Date: {date}
Page: {page}
Browser: {agent}
",
        name = form.name.trim(),
        email = form.email.trim(),
        phone = or_placeholder(&form.phone, PHONE_PLACEHOLDER),
        company = or_placeholder(&form.company, COMPANY_PLACEHOLDER),
        priority = match form.priority {
            Priority::Urgent => "URGENT",
            Priority::Normal => "Normal",
        },
        message = form.message,
        date = now.format("%Y-%m-%d %H:%M"),
        page = page.page_url,
        agent = page.user_agent,
    );

    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(&body)
    )
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    match value.trim() {
        "" => placeholder,
        v => v,
    }
}

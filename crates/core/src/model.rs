use serde::{Deserialize, Serialize};

/// Keywords that escalate a submission to urgent when found in its subject or message.
pub const URGENT_KEYWORDS: &[&str] = &["urgence", "urgent", "important", "critique", "immédiat"];

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(Priority::Normal),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Raw values as typed into the form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub newsletter: bool,
}

/// A validated contact-form entry.
///
/// Server-derived metadata (id, timestamps, IP, user agent) is not part of
/// this type; it is attached when the submission is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

/// Urgency is derived, never stored: explicit urgent priority, or any of
/// `keywords` appearing case-insensitively in the subject or message.
pub fn is_urgent(submission: &Submission, keywords: &[&str]) -> bool {
    if submission.priority == Priority::Urgent {
        return true;
    }

    let text = format!("{} {}", submission.subject, submission.message).to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

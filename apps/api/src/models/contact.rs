#![allow(dead_code)]

use chrono::{DateTime, Utc};
use contact_core::{Priority, Submission};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted contact submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub priority: String,
    pub newsletter: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactRow {
    /// The user-supplied part of the row.
    pub fn submission(&self) -> Submission {
        Submission {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            priority: Priority::parse(&self.priority).unwrap_or_default(),
            newsletter: self.newsletter,
            page_url: self.page_url.clone(),
        }
    }
}

/// Insert parameters: the submission plus server-derived metadata.
#[derive(Debug)]
pub struct NewContact<'a> {
    pub submission: &'a Submission,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

use std::net::SocketAddr;

use axum::http::{header, HeaderMap};
use contact_core::validation::invalid_priority;
use contact_core::{validate_form, ContactForm, Priority, Submission, ValidationErrors};
use serde::Deserialize;

/// The JSON body as sent by the browser. Every field is optional at this
/// stage so that missing fields surface as validation errors, not as a
/// generic parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub priority: Option<String>,
    pub newsletter: Option<bool>,
    pub page_url: Option<String>,
}

impl ContactPayload {
    pub fn into_submission(self) -> Result<Submission, ValidationErrors> {
        let (priority, priority_error) = match self.priority.as_deref().map(Priority::parse) {
            None => (Priority::Normal, None),
            Some(Some(p)) => (p, None),
            Some(None) => (Priority::Normal, Some(invalid_priority())),
        };

        let form = ContactForm {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            priority,
            newsletter: self.newsletter.unwrap_or(false),
        };

        match (validate_form(&form), priority_error) {
            (Ok(mut submission), None) => {
                submission.page_url = self
                    .page_url
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty());
                Ok(submission)
            }
            (Ok(_), Some(e)) => {
                let mut errors = ValidationErrors::default();
                errors.push(e);
                Err(errors)
            }
            (Err(mut errors), priority_error) => {
                if let Some(e) = priority_error {
                    errors.push(e);
                }
                Err(errors)
            }
        }
    }
}

/// Request metadata captured at receipt time, never taken from the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMeta {
    pub remote_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// The first `X-Forwarded-For` hop wins over the socket peer address.
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            remote_ip: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn payload(json: &str) -> ContactPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_payload_is_valid() {
        let s = payload(r#"{"name":"A","email":"a@b.com","subject":"Info","message":"bonjour"}"#)
            .into_submission()
            .unwrap();
        assert_eq!(s.priority, Priority::Normal);
        assert_eq!(s.page_url, None);
    }

    #[test]
    fn test_missing_email_and_subject() {
        let errors = payload(r#"{"name":"A","message":"bonjour"}"#)
            .into_submission()
            .unwrap_err();
        assert_eq!(errors.field_names(), vec!["email", "subject"]);
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let errors = payload(
            r#"{"name":"A","email":"a@b.com","subject":"Info","message":"x","priority":"high"}"#,
        )
        .into_submission()
        .unwrap_err();
        assert_eq!(errors.field_names(), vec!["priority"]);
    }

    #[test]
    fn test_unknown_priority_reported_after_field_errors() {
        let errors = payload(r#"{"priority":"asap"}"#)
            .into_submission()
            .unwrap_err();
        assert_eq!(
            errors.field_names(),
            vec!["name", "email", "subject", "message", "priority"]
        );
    }

    #[test]
    fn test_page_url_kept() {
        let s = payload(
            r#"{"name":"A","email":"a@b.com","subject":"Info","message":"x","page_url":" https://site/contact "}"#,
        )
        .into_submission()
        .unwrap();
        assert_eq!(s.page_url.as_deref(), Some("https://site/contact"));
    }

    #[test]
    fn test_meta_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        let meta = RequestMeta::from_request(&headers, Some(peer));
        assert_eq!(meta.remote_ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(meta.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_meta_falls_back_to_peer() {
        let peer: SocketAddr = "192.168.1.4:5000".parse().unwrap();
        let meta = RequestMeta::from_request(&HeaderMap::new(), Some(peer));
        assert_eq!(meta.remote_ip.as_deref(), Some("192.168.1.4"));
        assert_eq!(meta.user_agent, None);
    }
}

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{ContactForm, Submission};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+()\-\s0-9]{8,20}$").expect("valid phone pattern"));

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Company,
    Subject,
    Message,
    Priority,
}

impl Field {
    /// Form order; errors are reported in this order.
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Company,
        Field::Subject,
        Field::Message,
        Field::Priority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Company => "company",
            Field::Subject => "subject",
            Field::Message => "message",
            Field::Priority => "priority",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Field::Name | Field::Email | Field::Subject | Field::Message
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All field-level failures of one form, in form order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

/// Validates a single field value.
///
/// Required fields must be non-blank. Email must look like an address.
/// Phone is optional but, when present, must be 8–20 characters of ASCII digits,
/// spaces, `+`, `-` or parentheses.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    let value = value.trim();

    if field.is_required() && value.is_empty() {
        return Err(FieldError::new(field, "This field is required"));
    }

    match field {
        Field::Email if !EMAIL_PATTERN.is_match(value) => Err(FieldError::new(
            field,
            "Please enter a valid email address",
        )),
        Field::Phone if !value.is_empty() && !PHONE_PATTERN.is_match(value) => Err(
            FieldError::new(field, "Please enter a valid phone number"),
        ),
        _ => Ok(()),
    }
}

/// Validates every field of the form, collecting all failures.
pub fn validate_form(form: &ContactForm) -> Result<Submission, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let values = [
        (Field::Name, form.name.as_str()),
        (Field::Email, form.email.as_str()),
        (Field::Phone, form.phone.as_str()),
        (Field::Company, form.company.as_str()),
        (Field::Subject, form.subject.as_str()),
        (Field::Message, form.message.as_str()),
    ];
    for (field, value) in values {
        if let Err(e) = validate_field(field, value) {
            errors.push(e);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Submission {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: non_blank(&form.phone),
        company: non_blank(&form.company),
        subject: form.subject.trim().to_string(),
        message: form.message.clone(),
        priority: form.priority,
        newsletter: form.newsletter,
        page_url: None,
    })
}

/// Rejection for a priority value outside `normal`/`urgent`.
pub fn invalid_priority() -> FieldError {
    FieldError::new(Field::Priority, "Priority must be 'normal' or 'urgent'")
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Jean".to_string(),
            email: "jean@x.com".to_string(),
            phone: String::new(),
            company: String::new(),
            subject: "Info".to_string(),
            message: "bonjour".to_string(),
            priority: Priority::Normal,
            newsletter: true,
        }
    }

    #[test]
    fn test_required_field_blank() {
        let err = validate_field(Field::Name, "   ").unwrap_err();
        assert_eq!(err.field, Field::Name);
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_field(Field::Email, "a@b.com").is_ok());
        assert!(validate_field(Field::Email, "a@b").is_err());
        assert!(validate_field(Field::Email, "a b@c.com").is_err());
        assert!(validate_field(Field::Email, "ab.com").is_err());
    }

    #[test]
    fn test_phone_optional_and_loose() {
        assert!(validate_field(Field::Phone, "").is_ok());
        assert!(validate_field(Field::Phone, "+243 (85) 229-1755").is_ok());
        assert!(validate_field(Field::Phone, "1234567").is_err());
        assert!(validate_field(Field::Phone, "call me maybe").is_err());
        assert!(validate_field(Field::Phone, "+243 852 291 755 000 111").is_err());
    }

    #[test]
    fn test_phone_rejects_non_ascii_digits() {
        assert!(validate_field(Field::Phone, "٠١٢٣٤٥٦٧").is_err());
        assert!(validate_field(Field::Phone, "+243 ８５２ 291 755").is_err());
    }

    #[test]
    fn test_company_unconstrained() {
        assert!(validate_field(Field::Company, "").is_ok());
    }

    #[test]
    fn test_validate_form_ok_trims_and_drops_blank_optionals() {
        let mut form = valid_form();
        form.name = "  Jean ".to_string();
        form.company = "   ".to_string();
        let s = validate_form(&form).unwrap();
        assert_eq!(s.name, "Jean");
        assert_eq!(s.company, None);
        assert_eq!(s.phone, None);
        assert!(s.newsletter);
    }

    #[test]
    fn test_validate_form_collects_all_errors_in_order() {
        let form = ContactForm {
            email: "nope".to_string(),
            phone: "abc".to_string(),
            ..ContactForm::default()
        };
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(
            errors.field_names(),
            vec!["name", "email", "phone", "subject", "message"]
        );
        assert!(errors.get(Field::Company).is_none());
    }

    #[test]
    fn test_validation_errors_serialize_as_list() {
        let errors = validate_form(&ContactForm::default()).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "name");
        assert_eq!(json.as_array().unwrap().len(), 4);
    }
}

//! Shared contact-form domain: submission model, validation, urgency rules,
//! message composition and the notification fan-out used by both the
//! submission endpoint and the client controller.

pub mod channel;
pub mod compose;
pub mod dispatch;
pub mod model;
pub mod validation;

pub use channel::{ChannelError, ChannelKind, EmailProvider, SmsProvider};
pub use dispatch::{ChannelReport, DispatchReport, DispatchSettings, Dispatcher, RecipientOutcome};
pub use model::{is_urgent, ContactForm, Priority, Submission, URGENT_KEYWORDS};
pub use validation::{validate_field, validate_form, Field, FieldError, ValidationErrors};

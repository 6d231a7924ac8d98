use std::time::Duration;

use contact_core::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    Info,
}

/// The UI surface the controller drives. Implemented by the host page.
pub trait FormView {
    /// Toggles the submit control and its busy indicator.
    fn set_submitting(&self, busy: bool, label: &str);
    fn show_field_error(&self, field: Field, message: &str);
    fn clear_field_error(&self, field: Field);
    /// `auto_dismiss` of `None` keeps the alert until closed.
    fn show_alert(&self, kind: AlertKind, message: &str, auto_dismiss: Option<Duration>);
    fn show_toast(&self, kind: AlertKind, message: &str);
    fn reset_form(&self);
    fn open_url(&self, url: &str);
}

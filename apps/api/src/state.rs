use contact_core::Dispatcher;
use sqlx::SqlitePool;

use crate::contact::journal::ContactLog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Email and SMS fan-out with the configured recipient lists.
    pub dispatcher: Dispatcher,
    pub contact_log: ContactLog,
}

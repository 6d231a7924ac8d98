use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports whether the contact store answers and which notification
/// channels are wired. Always 200 so load balancers can read the body.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "service": "contact-api",
        "database": database,
        "channels": {
            "email": state.dispatcher.email_available(),
            "sms": state.dispatcher.sms_available(),
        },
    }))
}

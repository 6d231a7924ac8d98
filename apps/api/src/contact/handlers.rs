use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;

use crate::contact::payload::{ContactPayload, RequestMeta};
use crate::contact::pipeline::{process, SubmitResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /contact
pub async fn handle_submit(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let payload: ContactPayload =
        serde_json::from_slice(&body).map_err(|e| AppError::MalformedBody(e.to_string()))?;
    let submission = payload.into_submission()?;
    let meta = RequestMeta::from_request(&headers, peer.map(|ConnectInfo(addr)| addr));

    let response = process(&state, submission, meta).await?;
    Ok(Json(response))
}

/// Any other method on /contact.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

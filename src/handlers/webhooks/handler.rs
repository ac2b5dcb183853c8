//! Judge callback handler implementation

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{error::AppResult, services::WebhookService, state::AppState};

use super::request::{JudgeCallbackQuery, JudgeCallbackRequest};

/// Ingest one judge callback.
///
/// Always acknowledges with 200 when the secret matches, including for
/// unknown tokens and replays, so the judge's own retry machinery is never
/// triggered by benign cases. 401 only on secret mismatch.
pub async fn judge_callback(
    State(state): State<AppState>,
    Query(query): Query<JudgeCallbackQuery>,
    Json(payload): Json<JudgeCallbackRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let secret = query.secret.unwrap_or_default();

    let time_secs = payload.time.as_ref().and_then(|t| t.as_f64());
    let memory_kb = payload
        .memory
        .as_ref()
        .and_then(|m| m.as_f64())
        .map(|m| m as i64);

    let outcome = WebhookService::ingest(
        state.db(),
        state.config(),
        &secret,
        &payload.token,
        &payload.status.description,
        time_secs,
        memory_kb,
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "received": true, "outcome": format!("{outcome:?}") })),
    ))
}

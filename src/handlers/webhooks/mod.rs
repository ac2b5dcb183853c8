//! Judge callback handlers

mod handler;
pub mod request;

use axum::{Router, routing::put};

use crate::state::AppState;

/// Webhook routes. The judge delivers one callback per test case.
pub fn routes() -> Router<AppState> {
    Router::new().route("/judge", put(handler::judge_callback).post(handler::judge_callback))
}

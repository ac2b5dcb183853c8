//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod contests;
pub mod health;
pub mod submissions;
pub mod webhooks;

use axum::{Router, middleware};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/contests", contests::routes(state.clone()))
        .nest(
            "/submissions",
            submissions::routes().route_layer(middleware::from_fn_with_state(
                state,
                auth_middleware,
            )),
        )
        // Callbacks authenticate with the shared secret, not a JWT
        .nest("/webhooks", webhooks::routes())
}

//! Contest handlers

mod handler;
pub mod response;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Contest routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/{id}", get(handler::get_contest))
        .route("/{id}/problems", get(handler::list_problems))
        .route("/{id}/leaderboard", get(handler::leaderboard))
        .route(
            "/{id}/register",
            post(handler::register)
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

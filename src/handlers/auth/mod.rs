//! Authentication handlers

mod handler;
pub mod request;
pub mod response;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Auth routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route(
            "/me",
            get(handler::me).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

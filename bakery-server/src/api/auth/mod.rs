//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::state::ServerState;

/// - /api/auth/login: public
/// - /api/auth/me: authenticated (global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
}

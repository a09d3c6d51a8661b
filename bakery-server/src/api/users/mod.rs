//! User API Module
//!
//! Account management is admin-only, except that any user may edit their
//! own profile through `PUT /api/users/{id}`.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    // admin or self, checked in the handler
    let profile_routes = Router::new().route("/{id}", put(handler::update));

    manage_routes.merge(profile_routes)
}

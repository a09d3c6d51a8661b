//! API routes
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - login and current user
//! - [`customers`] - customer management
//! - [`products`] - cake catalogue
//! - [`orders`] - order composition and tracking
//! - [`users`] - back-office accounts (admin)
//! - [`reports`] - production, delivery and sales reports
//! - [`dashboard`] - front-page figures

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;


use axum::{Router, middleware};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use shared::{AppError, ErrorCode};

use crate::auth::require_auth;
use crate::db::repository::{RepoError, SortDir};
use crate::state::ServerState;

/// Query string shared by the list endpoints
///
/// A non-blank `q` searches; otherwise `sort`/`dir` pick the ordering.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl ListQuery {
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn direction(&self, default: SortDir) -> SortDir {
        SortDir::parse_or(self.dir.as_deref(), default)
    }
}

/// Map a repository error, reporting a missing row with a resource-specific code
pub(crate) fn missing_as(code: ErrorCode) -> impl Fn(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => AppError::new(code),
        other => other.into(),
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(customers::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(reports::router())
        .merge(dashboard::router())
}

/// The complete application: routes, authentication and HTTP middleware
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // require_auth skips the public routes itself
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

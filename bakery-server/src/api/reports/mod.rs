//! Report API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily-production", get(handler::daily_production))
        .route("/delivery-schedule", get(handler::delivery_schedule))
        .route("/monthly-sales", get(handler::monthly_sales))
}

//! Dashboard API Module

use axum::{Router, extract::State, routing::get};
use shared::models::Dashboard;
use shared::{ApiResponse, AppResult};

use crate::services::reporting;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

/// Today's deliveries, customer count, month income and upcoming orders
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<ApiResponse<Dashboard>> {
    let offset = state.business_offset();
    let today = reporting::business_today(offset);
    let figures = reporting::dashboard(&state.pool, today, offset).await;
    Ok(ApiResponse::success(figures))
}

//! Report API Handlers
//!
//! Dates default to today and months to the current month, both on the
//! shop's wall clock.

use axum::extract::{Query, State};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use shared::models::{DailyProductionReport, DeliveryScheduleReport, MonthlySalesReport};
use shared::{ApiResponse, AppResult};

use crate::services::reporting;
use crate::state::ServerState;
use crate::validation::FieldErrors;
use crate::validation::order::parse_date;

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

/// Parse an optional `YYYY-MM-DD` parameter, defaulting to `today`
fn date_param(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    today: NaiveDate,
) -> NaiveDate {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => today,
        Some(raw) => parse_date(raw).unwrap_or_else(|| {
            errors.add(field, "Invalid date format.");
            today
        }),
    }
}

pub async fn daily_production(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<ApiResponse<DailyProductionReport>> {
    let today = reporting::business_today(state.business_offset());
    let mut errors = FieldErrors::new();
    let date = date_param(&mut errors, "date", query.date.as_deref(), today);
    errors.into_result()?;

    let report = reporting::daily_production(&state.pool, date).await;
    Ok(ApiResponse::success(report))
}

pub async fn delivery_schedule(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<ApiResponse<DeliveryScheduleReport>> {
    let today = reporting::business_today(state.business_offset());
    let mut errors = FieldErrors::new();
    let start = date_param(&mut errors, "start", query.start.as_deref(), today);
    let end = date_param(&mut errors, "end", query.end.as_deref(), today);
    errors.into_result()?;

    let report = reporting::delivery_schedule(&state.pool, start, end).await?;
    Ok(ApiResponse::success(report))
}

pub async fn monthly_sales(
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<ApiResponse<MonthlySalesReport>> {
    let offset = state.business_offset();
    let month = match query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => month.to_string(),
        None => {
            let today = reporting::business_today(offset);
            format!("{:04}-{:02}", today.year(), today.month())
        }
    };

    let report = reporting::monthly_sales(&state.pool, &month, offset).await?;
    Ok(ApiResponse::success(report))
}

//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Customer, CustomerInput, OrderSummary};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{ListQuery, missing_as};
use crate::audit_log;
use crate::auth::RequestContext;
use crate::db::repository::{SortDir, customer, order};
use crate::services::referential_guard;
use crate::state::ServerState;
use crate::validation::customer::{normalize_customer, validate_customer};

/// List customers, or search them when `q` is given
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Customer>>> {
    let customers = match query.search_term() {
        Some(term) => customer::search(&state.pool, term).await?,
        None => {
            customer::find_all(
                &state.pool,
                query.sort.as_deref(),
                query.direction(SortDir::Asc),
            )
            .await?
        }
    };
    Ok(ApiResponse::success(customers))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Customer>> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(ApiResponse::success(found))
}

pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<CustomerInput>,
) -> AppResult<ApiResponse<Customer>> {
    validate_customer(&payload).into_result()?;
    let created = customer::create(&state.pool, &normalize_customer(payload)).await?;

    audit_log!(ctx.user_id, "create", format!("customer:{}", created.id));
    Ok(ApiResponse::success_with_message(
        "Customer added successfully!",
        created,
    ))
}

/// Replace every field of a customer
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerInput>,
) -> AppResult<ApiResponse<Customer>> {
    validate_customer(&payload).into_result()?;
    let updated = customer::update(&state.pool, id, &normalize_customer(payload))
        .await
        .map_err(missing_as(ErrorCode::CustomerNotFound))?;

    audit_log!(ctx.user_id, "update", format!("customer:{id}"));
    Ok(ApiResponse::success_with_message(
        "Customer updated successfully!",
        updated,
    ))
}

/// Delete a customer that has no orders
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    referential_guard::delete_customer(&state.pool, id)
        .await
        .into_result(ErrorCode::CustomerNotFound)?;

    audit_log!(ctx.user_id, "delete", format!("customer:{id}"));
    Ok(ApiResponse::ok())
}

/// Order history of one customer
pub async fn orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<OrderSummary>>> {
    if !customer::exists(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::CustomerNotFound));
    }
    let orders = order::find_by_customer(&state.pool, id).await?;
    Ok(ApiResponse::success(orders))
}

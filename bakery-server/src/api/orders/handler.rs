//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{OrderCreate, OrderDetail, OrderSummary, OrderUpdate};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::api::{ListQuery, missing_as};
use crate::audit_log;
use crate::auth::RequestContext;
use crate::db::repository::{SortDir, order};
use crate::services::{create_order, referential_guard};
use crate::state::ServerState;
use crate::validation::order::{check_order_create, check_order_update};

async fn load_detail(pool: &SqlitePool, id: i64) -> AppResult<OrderDetail> {
    order::find_detail(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// List orders (newest first by default), or search them when `q` is given
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<OrderSummary>>> {
    let orders = match query.search_term() {
        Some(term) => order::search(&state.pool, term).await?,
        None => {
            order::find_all(
                &state.pool,
                query.sort.as_deref(),
                query.direction(SortDir::Desc),
            )
            .await?
        }
    };
    Ok(ApiResponse::success(orders))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDetail>> {
    Ok(ApiResponse::success(load_detail(&state.pool, id).await?))
}

/// Compose a new order taken by the calling user
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let new_order = check_order_create(&payload)?;
    let id = create_order(&state.pool, &ctx, new_order).await?;

    let detail = load_detail(&state.pool, id).await?;
    Ok(ApiResponse::success_with_message(
        "Order created successfully!",
        detail,
    ))
}

/// Change status, payment or delivery details; absent fields are kept
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let changes = check_order_update(&payload)?;
    if changes.is_empty() {
        return Err(AppError::invalid_request("No order fields to update"));
    }
    let updated = order::update(&state.pool, id, &changes)
        .await
        .map_err(missing_as(ErrorCode::OrderNotFound))?;

    audit_log!(
        ctx.user_id,
        "update",
        format!("order:{id}"),
        format!("status={} paid={}", updated.order_status, updated.is_paid)
    );
    let detail = load_detail(&state.pool, id).await?;
    Ok(ApiResponse::success_with_message(
        "Order updated successfully!",
        detail,
    ))
}

/// Delete an undelivered order together with its items
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    referential_guard::delete_order(&state.pool, id)
        .await
        .into_result(ErrorCode::OrderNotFound)?;

    audit_log!(ctx.user_id, "delete", format!("order:{id}"));
    Ok(ApiResponse::ok())
}

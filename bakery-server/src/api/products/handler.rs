//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Product, ProductInput};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::{ListQuery, missing_as};
use crate::audit_log;
use crate::auth::RequestContext;
use crate::db::repository::{SortDir, product};
use crate::services::money::round2;
use crate::services::referential_guard;
use crate::state::ServerState;
use crate::validation::product::{normalize_product, validate_product};

/// Validate a payload, returning it normalized with its rounded price
fn checked(payload: ProductInput) -> AppResult<(ProductInput, f64)> {
    validate_product(&payload).into_result()?;
    let price = payload
        .base_price
        .map(round2)
        .ok_or_else(|| AppError::new(ErrorCode::ProductInvalidPrice))?;
    Ok((normalize_product(payload), price))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let products = match query.search_term() {
        Some(term) => product::search(&state.pool, term).await?,
        None => {
            product::find_all(
                &state.pool,
                query.sort.as_deref(),
                query.direction(SortDir::Asc),
            )
            .await?
        }
    };
    Ok(ApiResponse::success(products))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ApiResponse::success(found))
}

pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<ProductInput>,
) -> AppResult<ApiResponse<Product>> {
    let (input, price) = checked(payload)?;
    let created = product::create(&state.pool, &input, price).await?;

    audit_log!(ctx.user_id, "create", format!("product:{}", created.id));
    Ok(ApiResponse::success_with_message(
        "Product added successfully!",
        created,
    ))
}

/// Replace every field of a product; existing order items keep their prices
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInput>,
) -> AppResult<ApiResponse<Product>> {
    let (input, price) = checked(payload)?;
    let updated = product::update(&state.pool, id, &input, price)
        .await
        .map_err(missing_as(ErrorCode::ProductNotFound))?;

    audit_log!(ctx.user_id, "update", format!("product:{id}"));
    Ok(ApiResponse::success_with_message(
        "Product updated successfully!",
        updated,
    ))
}

/// Delete a product no order references
pub async fn delete(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    referential_guard::delete_product(&state.pool, id)
        .await
        .into_result(ErrorCode::ProductNotFound)?;

    audit_log!(ctx.user_id, "delete", format!("product:{id}"));
    Ok(ApiResponse::ok())
}

//! Referential Guard
//!
//! Checked deletes. Each check and its delete share one transaction; the
//! `ON DELETE RESTRICT` foreign keys catch a dependent row inserted by a
//! concurrent writer, which is reported as the matching conflict.

use shared::models::{OrderStatus, UserRole};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::RequestContext;
use crate::db::repository::{RepoError, RepoResult, customer, order, product, user};

/// Result of a guarded delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    HasOrders,
    InUse,
    CannotDeleteSelf,
    CannotDeleteAdmin,
    DeliveredOrder,
    NotFound,
    Error,
}

impl DeleteOutcome {
    /// Map to an API result; `not_found` is the resource-specific code
    pub fn into_result(self, not_found: ErrorCode) -> AppResult<()> {
        let code = match self {
            Self::Deleted => return Ok(()),
            Self::HasOrders => ErrorCode::CustomerHasOrders,
            Self::InUse => ErrorCode::ProductInUse,
            Self::CannotDeleteSelf => ErrorCode::CannotDeleteSelf,
            Self::CannotDeleteAdmin => ErrorCode::CannotDeleteAdmin,
            Self::DeliveredOrder => ErrorCode::OrderDelivered,
            Self::NotFound => not_found,
            Self::Error => {
                return Err(AppError::database(
                    "Record could not be deleted. Please try again.",
                ));
            }
        };
        Err(AppError::new(code))
    }
}

/// Fold a storage failure into an outcome; `conflict` covers FK violations
fn settle(result: RepoResult<DeleteOutcome>, conflict: DeleteOutcome, what: &str) -> DeleteOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(RepoError::ForeignKey(_)) => conflict,
        Err(e) => {
            tracing::error!(error = %e, entity = what, "Guarded delete failed");
            DeleteOutcome::Error
        }
    }
}

fn deleted_or_missing(removed: bool) -> DeleteOutcome {
    if removed {
        DeleteOutcome::Deleted
    } else {
        DeleteOutcome::NotFound
    }
}

/// Delete a customer with no orders
pub async fn delete_customer(pool: &SqlitePool, id: i64) -> DeleteOutcome {
    let result = try_delete_customer(pool, id).await;
    settle(result, DeleteOutcome::HasOrders, "customer")
}

async fn try_delete_customer(pool: &SqlitePool, id: i64) -> RepoResult<DeleteOutcome> {
    let mut tx = pool.begin().await?;
    if customer::count_orders(&mut *tx, id).await? > 0 {
        return Ok(DeleteOutcome::HasOrders);
    }
    let removed = customer::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(deleted_or_missing(removed))
}

/// Delete a product no order item references
pub async fn delete_product(pool: &SqlitePool, id: i64) -> DeleteOutcome {
    let result = try_delete_product(pool, id).await;
    settle(result, DeleteOutcome::InUse, "product")
}

async fn try_delete_product(pool: &SqlitePool, id: i64) -> RepoResult<DeleteOutcome> {
    let mut tx = pool.begin().await?;
    if product::count_order_items(&mut *tx, id).await? > 0 {
        return Ok(DeleteOutcome::InUse);
    }
    let removed = product::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(deleted_or_missing(removed))
}

/// Delete a Staff account other than the caller's own
pub async fn delete_user(pool: &SqlitePool, ctx: &RequestContext, target_id: i64) -> DeleteOutcome {
    if target_id == ctx.user_id {
        return DeleteOutcome::CannotDeleteSelf;
    }
    let result = try_delete_user(pool, target_id).await;
    settle(result, DeleteOutcome::Error, "user")
}

async fn try_delete_user(pool: &SqlitePool, target_id: i64) -> RepoResult<DeleteOutcome> {
    let mut tx = pool.begin().await?;
    let Some(target) = user::find_by_id(&mut *tx, target_id).await? else {
        return Ok(DeleteOutcome::NotFound);
    };
    if target.role == UserRole::Admin {
        return Ok(DeleteOutcome::CannotDeleteAdmin);
    }
    let removed = user::delete(&mut *tx, target_id).await?;
    tx.commit().await?;
    Ok(deleted_or_missing(removed))
}

/// Delete an order that has not been delivered, items included
pub async fn delete_order(pool: &SqlitePool, id: i64) -> DeleteOutcome {
    let result = try_delete_order(pool, id).await;
    settle(result, DeleteOutcome::Error, "order")
}

async fn try_delete_order(pool: &SqlitePool, id: i64) -> RepoResult<DeleteOutcome> {
    let mut tx = pool.begin().await?;
    let Some(existing) = order::find_by_id(&mut *tx, id).await? else {
        return Ok(DeleteOutcome::NotFound);
    };
    if existing.order_status == OrderStatus::Delivered {
        return Ok(DeleteOutcome::DeliveredOrder);
    }
    let removed = order::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(deleted_or_missing(removed))
}

//! Report Repository
//!
//! Read-only rollups. Month windows are `[start_ms, end_ms)` over
//! `orders.order_date`; Cancelled orders are excluded unless noted.

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{
    OrderItemDetail, OrderSummary, ProductionOrder, SalesSummary, StatusBreakdown, TopCustomer,
    DailyTrend, UpcomingOrder,
};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.user_id, o.order_date, o.delivery_date, o.delivery_time, o.delivery_address, o.order_status, o.total_amount, o.is_paid, o.special_requirements";

/// Orders to bake for `date` (open orders only), by delivery time then id
pub async fn production_orders(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<Vec<ProductionOrder>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name, c.phone_number AS customer_phone FROM orders o JOIN customers c ON c.id = o.customer_id WHERE o.delivery_date = ? AND o.order_status NOT IN ('Delivered', 'Cancelled') ORDER BY o.delivery_time ASC, o.id ASC"
    );
    let rows = sqlx::query_as::<_, ProductionOrder>(&sql)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Items of the orders returned by [`production_orders`], grouped by order
pub async fn production_items(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<Vec<OrderItemDetail>> {
    let rows = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, oi.size, oi.customization, p.cake_name FROM order_items oi JOIN products p ON p.id = oi.product_id JOIN orders o ON o.id = oi.order_id WHERE o.delivery_date = ? AND o.order_status NOT IN ('Delivered', 'Cancelled') ORDER BY oi.order_id ASC, oi.id ASC",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders delivering within `[start, end]`
pub async fn delivery_range(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name FROM orders o JOIN customers c ON c.id = o.customer_id WHERE o.delivery_date BETWEEN ? AND ? AND o.order_status <> 'Cancelled' ORDER BY o.delivery_date ASC, o.delivery_time ASC, o.id ASC"
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn sales_summary(pool: &SqlitePool, start_ms: i64, end_ms: i64) -> RepoResult<SalesSummary> {
    let row = sqlx::query_as::<_, SalesSummary>(
        "SELECT COUNT(*) AS total_orders, \
                COALESCE(SUM(total_amount), 0.0) AS total_revenue, \
                COALESCE(AVG(total_amount), 0.0) AS avg_order_value, \
                COALESCE(MAX(total_amount), 0.0) AS max_order_value, \
                COALESCE(MIN(total_amount), 0.0) AS min_order_value, \
                COUNT(DISTINCT customer_id) AS unique_customers \
         FROM orders \
         WHERE order_date >= ? AND order_date < ? AND order_status <> 'Cancelled'",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Count and revenue per status; Cancelled orders are included here
pub async fn status_breakdown(
    pool: &SqlitePool,
    start_ms: i64,
    end_ms: i64,
) -> RepoResult<Vec<StatusBreakdown>> {
    let rows = sqlx::query_as::<_, StatusBreakdown>(
        "SELECT order_status, COUNT(*) AS count, COALESCE(SUM(total_amount), 0.0) AS revenue \
         FROM orders WHERE order_date >= ? AND order_date < ? \
         GROUP BY order_status ORDER BY count DESC, order_status ASC",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn top_customers(
    pool: &SqlitePool,
    start_ms: i64,
    end_ms: i64,
    limit: i64,
) -> RepoResult<Vec<TopCustomer>> {
    let rows = sqlx::query_as::<_, TopCustomer>(
        "SELECT c.id AS customer_id, c.full_name, COUNT(o.id) AS order_count, COALESCE(SUM(o.total_amount), 0.0) AS total_spent \
         FROM orders o JOIN customers c ON c.id = o.customer_id \
         WHERE o.order_date >= ? AND o.order_date < ? AND o.order_status <> 'Cancelled' \
         GROUP BY c.id, c.full_name ORDER BY total_spent DESC, c.id ASC LIMIT ?",
    )
    .bind(start_ms)
    .bind(end_ms)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders and revenue per business-local order day
pub async fn daily_trend(
    pool: &SqlitePool,
    start_ms: i64,
    end_ms: i64,
    utc_offset_secs: i64,
) -> RepoResult<Vec<DailyTrend>> {
    let rows = sqlx::query_as::<_, DailyTrend>(
        "SELECT date(order_date / 1000 + ?1, 'unixepoch') AS order_date, COUNT(*) AS orders, COALESCE(SUM(total_amount), 0.0) AS revenue \
         FROM orders WHERE order_date >= ?2 AND order_date < ?3 AND order_status <> 'Cancelled' \
         GROUP BY 1 ORDER BY 1 ASC",
    )
    .bind(utc_offset_secs)
    .bind(start_ms)
    .bind(end_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders delivering on `date`, Cancelled excluded
pub async fn count_deliveries_on(pool: &SqlitePool, date: NaiveDate) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders WHERE delivery_date = ? AND order_status <> 'Cancelled'",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

/// Open orders delivering on or after `from`, soonest first
pub async fn upcoming_orders(
    pool: &SqlitePool,
    from: NaiveDate,
    limit: i64,
) -> RepoResult<Vec<UpcomingOrder>> {
    let rows = sqlx::query_as::<_, UpcomingOrder>(
        "SELECT o.id, o.delivery_date, o.delivery_time, o.order_status, o.total_amount, c.full_name AS customer_name \
         FROM orders o JOIN customers c ON c.id = o.customer_id \
         WHERE o.delivery_date >= ? AND o.order_status NOT IN ('Delivered', 'Cancelled') \
         ORDER BY o.delivery_date ASC, o.delivery_time ASC, o.id ASC LIMIT ?",
    )
    .bind(from)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

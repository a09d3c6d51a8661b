//! Reporting Aggregator
//!
//! Read-only rollups over orders. Storage failures are logged and turned
//! into empty or zeroed figures so a report page always renders; only bad
//! input (date range, month text) is reported back as an error.

use chrono::{Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use shared::models::{
    Dashboard, DailyProductionReport, DeliveryScheduleReport, MonthlySalesReport, PreviousMonth,
    ProductionOrder, SalesSummary,
};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use super::money::round2;
use crate::db::repository::{RepoResult, customer, report};

pub const TOP_CUSTOMERS_LIMIT: i64 = 5;
pub const UPCOMING_ORDERS_LIMIT: i64 = 10;

fn or_default<T: Default>(result: RepoResult<T>, report: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, report, "Report query failed");
        T::default()
    })
}

/// Today's date on the shop's wall clock
pub fn business_today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Parse `YYYY-MM` into `(year, month)`
pub fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let raw = raw.trim();
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn local_midnight_millis(year: i32, month: u32, offset: FixedOffset) -> Option<i64> {
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.timestamp_millis())
}

/// `[start_ms, end_ms)` of a calendar month in business local time
pub fn month_window(year: i32, month: u32, offset: FixedOffset) -> Option<(i64, i64)> {
    let (next_year, next) = next_month(year, month);
    Some((
        local_midnight_millis(year, month, offset)?,
        local_midnight_millis(next_year, next, offset)?,
    ))
}

fn rounded(mut summary: SalesSummary) -> SalesSummary {
    summary.total_revenue = round2(summary.total_revenue);
    summary.avg_order_value = round2(summary.avg_order_value);
    summary.max_order_value = round2(summary.max_order_value);
    summary.min_order_value = round2(summary.min_order_value);
    summary
}

/// Open orders delivering on `date`, each with its items
pub async fn daily_production(pool: &SqlitePool, date: NaiveDate) -> DailyProductionReport {
    let mut orders: Vec<ProductionOrder> =
        or_default(report::production_orders(pool, date).await, "daily_production");
    let items = or_default(report::production_items(pool, date).await, "daily_production");

    for item in items {
        if let Some(order) = orders.iter_mut().find(|o| o.order.id == item.item.order_id) {
            order.items.push(item);
        }
    }

    DailyProductionReport {
        date: Some(date),
        orders,
    }
}

/// Orders delivering within `[start, end]`
pub async fn delivery_schedule(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<DeliveryScheduleReport> {
    if start > end {
        return Err(AppError::new(ErrorCode::ReportInvalidRange)
            .with_detail("start", start.to_string())
            .with_detail("end", end.to_string()));
    }
    let orders = or_default(
        report::delivery_range(pool, start, end).await,
        "delivery_schedule",
    );
    Ok(DeliveryScheduleReport {
        start_date: Some(start),
        end_date: Some(end),
        orders,
    })
}

/// Sales figures for the `YYYY-MM` month, compared with the month before
pub async fn monthly_sales(
    pool: &SqlitePool,
    month_text: &str,
    offset: FixedOffset,
) -> AppResult<MonthlySalesReport> {
    let invalid =
        || AppError::new(ErrorCode::ReportInvalidMonth).with_detail("month", month_text.trim());
    let (year, month) = parse_month(month_text).ok_or_else(invalid)?;
    let (start, end) = month_window(year, month, offset).ok_or_else(invalid)?;
    let (prev_year, prev) = previous_month(year, month);
    let (prev_start, prev_end) = month_window(prev_year, prev, offset).ok_or_else(invalid)?;

    let summary = or_default(report::sales_summary(pool, start, end).await, "monthly_sales");
    let previous = or_default(
        report::sales_summary(pool, prev_start, prev_end).await,
        "monthly_sales",
    );

    let mut status_breakdown = or_default(
        report::status_breakdown(pool, start, end).await,
        "monthly_sales",
    );
    for row in &mut status_breakdown {
        row.revenue = round2(row.revenue);
    }

    let mut top_customers = or_default(
        report::top_customers(pool, start, end, TOP_CUSTOMERS_LIMIT).await,
        "monthly_sales",
    );
    for row in &mut top_customers {
        row.total_spent = round2(row.total_spent);
    }

    let offset_secs = i64::from(offset.local_minus_utc());
    let mut daily_trend = or_default(
        report::daily_trend(pool, start, end, offset_secs).await,
        "monthly_sales",
    );
    for row in &mut daily_trend {
        row.revenue = round2(row.revenue);
    }

    Ok(MonthlySalesReport {
        month: format!("{year:04}-{month:02}"),
        summary: rounded(summary),
        previous_month: PreviousMonth {
            prev_revenue: round2(previous.total_revenue),
            prev_orders: previous.total_orders,
        },
        status_breakdown,
        top_customers,
        daily_trend,
    })
}

/// Front-page figures for `today`
pub async fn dashboard(pool: &SqlitePool, today: NaiveDate, offset: FixedOffset) -> Dashboard {
    let orders_today = or_default(report::count_deliveries_on(pool, today).await, "dashboard");
    let total_customers = or_default(customer::count(pool).await, "dashboard");

    let month_income = match month_window(today.year(), today.month(), offset) {
        Some((start, end)) => {
            or_default(report::sales_summary(pool, start, end).await, "dashboard").total_revenue
        }
        None => 0.0,
    };

    let upcoming_orders = or_default(
        report::upcoming_orders(pool, today, UPCOMING_ORDERS_LIMIT).await,
        "dashboard",
    );

    Dashboard {
        today: Some(today),
        orders_today,
        total_customers,
        month_income: round2(month_income),
        upcoming_orders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{customer as customer_repo, order};
    use crate::services::order_composition::create_order;
    use crate::testing::{Seed, ctx, seeded};
    use chrono::{Duration, NaiveTime};
    use shared::models::{
        CustomerInput, DeliveryInfo, NewOrder, NewOrderItem, OrderChanges, OrderStatus,
    };

    fn mauritius() -> FixedOffset {
        FixedOffset::east_opt(4 * 3600).unwrap()
    }

    async fn place(
        seed: &Seed,
        customer_id: i64,
        date: NaiveDate,
        time: Option<NaiveTime>,
        quantity: i64,
    ) -> i64 {
        create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id,
                delivery: DeliveryInfo {
                    delivery_date: date,
                    delivery_time: time,
                    delivery_address: "Port Louis".into(),
                    order_status: OrderStatus::New,
                    is_paid: false,
                    special_requirements: None,
                },
                items: vec![NewOrderItem {
                    product_id: seed.product.id,
                    quantity,
                    size: None,
                    customization: None,
                }],
            },
        )
        .await
        .unwrap()
    }

    async fn set_status(seed: &Seed, id: i64, status: OrderStatus) {
        order::update(
            seed.pool(),
            id,
            &OrderChanges {
                order_status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[test]
    fn month_text_parsing() {
        assert_eq!(parse_month("2025-06"), Some((2025, 6)));
        assert_eq!(parse_month(" 2024-12 "), Some((2024, 12)));
        assert_eq!(parse_month("2025-13"), None);
        assert_eq!(parse_month("2025-6"), None);
        assert_eq!(parse_month("June"), None);
    }

    #[test]
    fn month_window_follows_business_offset() {
        let (start, end) = month_window(2025, 12, mauritius()).unwrap();
        let start_utc = Utc.timestamp_millis_opt(start).unwrap();
        let end_utc = Utc.timestamp_millis_opt(end).unwrap();
        assert_eq!(start_utc.to_rfc3339(), "2025-11-30T20:00:00+00:00");
        assert_eq!(end_utc.to_rfc3339(), "2025-12-31T20:00:00+00:00");
    }

    #[tokio::test]
    async fn production_sheet_groups_items_and_skips_closed_orders() {
        let seed = seeded().await;
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let late = place(&seed, seed.customer.id, day, NaiveTime::from_hms_opt(16, 0, 0), 1).await;
        let early = place(&seed, seed.customer.id, day, NaiveTime::from_hms_opt(9, 30, 0), 2).await;
        let done = place(&seed, seed.customer.id, day, None, 1).await;
        set_status(&seed, done, OrderStatus::Delivered).await;
        place(&seed, seed.customer.id, day.succ_opt().unwrap(), None, 1).await;

        let sheet = daily_production(seed.pool(), day).await;
        let ids: Vec<i64> = sheet.orders.iter().map(|o| o.order.id).collect();
        assert_eq!(ids, vec![early, late]);
        assert_eq!(sheet.orders[0].customer_name, "Jane Doe");
        assert_eq!(sheet.orders[0].items.len(), 1);
        assert_eq!(sheet.orders[0].items[0].item.quantity, 2);
        assert_eq!(sheet.orders[0].items[0].cake_name, "Chocolate Cake");
    }

    #[tokio::test]
    async fn schedule_is_inclusive_and_skips_cancelled() {
        let seed = seeded().await;
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let first = place(&seed, seed.customer.id, start, None, 1).await;
        let last = place(&seed, seed.customer.id, end, None, 1).await;
        let cancelled = place(&seed, seed.customer.id, start, None, 1).await;
        set_status(&seed, cancelled, OrderStatus::Cancelled).await;
        place(&seed, seed.customer.id, end.succ_opt().unwrap(), None, 1).await;

        let schedule = delivery_schedule(seed.pool(), start, end).await.unwrap();
        let ids: Vec<i64> = schedule.orders.iter().map(|o| o.order.id).collect();
        assert_eq!(ids, vec![first, last]);

        let err = delivery_schedule(seed.pool(), end, start).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportInvalidRange);
    }

    #[tokio::test]
    async fn monthly_sales_rolls_up_current_month() {
        let seed = seeded().await;
        let offset = mauritius();
        let today = business_today(offset);
        let other = customer_repo::create(
            seed.pool(),
            &CustomerInput {
                full_name: "Arjun Patel".into(),
                phone_number: "+230 5765 4321".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        place(&seed, seed.customer.id, today, None, 2).await;
        place(&seed, seed.customer.id, today, None, 1).await;
        place(&seed, other.id, today, None, 1).await;
        let cancelled = place(&seed, other.id, today, None, 4).await;
        set_status(&seed, cancelled, OrderStatus::Cancelled).await;

        let month = format!("{:04}-{:02}", today.year(), today.month());
        let sales = monthly_sales(seed.pool(), &month, offset).await.unwrap();

        assert_eq!(sales.month, month);
        assert_eq!(sales.summary.total_orders, 3);
        assert_eq!(sales.summary.total_revenue, 2000.0);
        assert_eq!(sales.summary.max_order_value, 1000.0);
        assert_eq!(sales.summary.min_order_value, 500.0);
        assert_eq!(sales.summary.avg_order_value, 666.67);
        assert_eq!(sales.summary.unique_customers, 2);
        assert_eq!(sales.previous_month, PreviousMonth::default());

        let cancelled_row = sales
            .status_breakdown
            .iter()
            .find(|r| r.order_status == OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled_row.count, 1);
        assert_eq!(cancelled_row.revenue, 2000.0);

        assert_eq!(sales.top_customers[0].full_name, "Jane Doe");
        assert_eq!(sales.top_customers[0].order_count, 2);
        assert_eq!(sales.top_customers[0].total_spent, 1500.0);
        assert_eq!(sales.top_customers.len(), 2);

        assert_eq!(sales.daily_trend.len(), 1);
        assert_eq!(sales.daily_trend[0].order_date, today.to_string());
        assert_eq!(sales.daily_trend[0].orders, 3);
    }

    #[tokio::test]
    async fn monthly_sales_rejects_bad_month() {
        let seed = seeded().await;
        let err = monthly_sales(seed.pool(), "2025/06", mauritius())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportInvalidMonth);
    }

    #[tokio::test]
    async fn dashboard_counts_today_and_lists_upcoming() {
        let seed = seeded().await;
        let offset = mauritius();
        let today = business_today(offset);
        place(&seed, seed.customer.id, today, None, 1).await;
        let cancelled = place(&seed, seed.customer.id, today, None, 1).await;
        set_status(&seed, cancelled, OrderStatus::Cancelled).await;
        let soon = place(&seed, seed.customer.id, today + Duration::days(2), None, 1).await;
        place(&seed, seed.customer.id, today - Duration::days(1), None, 1).await;
        for _ in 0..10 {
            place(&seed, seed.customer.id, today + Duration::days(30), None, 1).await;
        }

        let board = dashboard(seed.pool(), today, offset).await;
        assert_eq!(board.orders_today, 1);
        assert_eq!(board.total_customers, 1);
        assert_eq!(board.month_income, 13.0 * 500.0);
        assert_eq!(board.upcoming_orders.len(), UPCOMING_ORDERS_LIMIT as usize);
        assert_eq!(board.upcoming_orders[0].delivery_date, today);
        assert_eq!(board.upcoming_orders[1].id, soon);
    }

    #[tokio::test]
    async fn closed_pool_yields_empty_reports() {
        let seed = seeded().await;
        seed.pool().close().await;
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert!(daily_production(seed.pool(), day).await.orders.is_empty());
        assert!(
            delivery_schedule(seed.pool(), day, day)
                .await
                .unwrap()
                .orders
                .is_empty()
        );
        let sales = monthly_sales(seed.pool(), "2025-06", mauritius())
            .await
            .unwrap();
        assert_eq!(sales.summary, SalesSummary::default());

        let board = dashboard(seed.pool(), day, mauritius()).await;
        assert_eq!(board.orders_today, 0);
        assert_eq!(board.month_income, 0.0);
        assert!(board.upcoming_orders.is_empty());
    }
}

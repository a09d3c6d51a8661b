//! Report Models
//!
//! Read-only rollups over orders. Money values are `f64` rounded to 2 dp.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::order::{Order, OrderItemDetail, OrderStatus, OrderSummary};

/// One order on the production sheet, with the items to bake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductionOrder {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub order: Order,
    pub customer_name: String,
    pub customer_phone: String,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<OrderItemDetail>,
}

/// Daily production report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyProductionReport {
    pub date: Option<NaiveDate>,
    pub orders: Vec<ProductionOrder>,
}

/// Delivery schedule over an inclusive date range
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeliveryScheduleReport {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub orders: Vec<OrderSummary>,
}

/// Headline figures of a month (Cancelled orders excluded)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub max_order_value: f64,
    pub min_order_value: f64,
    pub unique_customers: i64,
}

/// Previous month comparison figures
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PreviousMonth {
    pub prev_revenue: f64,
    pub prev_orders: i64,
}

/// Order count and revenue per status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusBreakdown {
    pub order_status: OrderStatus,
    pub count: i64,
    pub revenue: f64,
}

/// Customer ranked by spend within the month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopCustomer {
    pub customer_id: i64,
    pub full_name: String,
    pub order_count: i64,
    pub total_spent: f64,
}

/// Orders and revenue for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyTrend {
    /// `YYYY-MM-DD` in business local time
    pub order_date: String,
    pub orders: i64,
    pub revenue: f64,
}

/// Monthly sales report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlySalesReport {
    /// `YYYY-MM`
    pub month: String,
    pub summary: SalesSummary,
    pub previous_month: PreviousMonth,
    pub status_breakdown: Vec<StatusBreakdown>,
    pub top_customers: Vec<TopCustomer>,
    pub daily_trend: Vec<DailyTrend>,
}

/// Upcoming delivery shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UpcomingOrder {
    pub id: i64,
    pub delivery_date: NaiveDate,
    pub delivery_time: Option<NaiveTime>,
    pub order_status: OrderStatus,
    pub total_amount: f64,
    pub customer_name: String,
}

/// Dashboard figures
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub today: Option<NaiveDate>,
    pub orders_today: i64,
    pub total_customers: i64,
    pub month_income: f64,
    pub upcoming_orders: Vec<UpcomingOrder>,
}

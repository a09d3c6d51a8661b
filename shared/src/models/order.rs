//! Order Model
//!
//! An order is a header row plus one or more line items. Item prices are
//! snapshots taken when the order was composed; they never follow later
//! product price changes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::util::double_option;

/// Production / delivery status of an order
///
/// Independent from payment, which is tracked by `is_paid`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderStatus {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    #[cfg_attr(feature = "db", sqlx(rename = "In Progress"))]
    InProgress,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|st| st.as_str() == s).ok_or(())
    }
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Creator; cleared if the account is later removed
    pub user_id: Option<i64>,
    /// Unix millis
    pub order_date: i64,
    pub delivery_date: NaiveDate,
    pub delivery_time: Option<NaiveTime>,
    pub delivery_address: String,
    pub order_status: OrderStatus,
    pub total_amount: f64,
    pub is_paid: bool,
    pub special_requirements: Option<String>,
}

/// Order header with the customer's name (list and search rows)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub order: Order,
    pub customer_name: String,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price snapshot
    pub price: f64,
    pub size: Option<String>,
    pub customization: Option<String>,
}

/// Line item with the product name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub item: OrderItem,
    pub cake_name: String,
}

/// Full order view: header, customer contact, creator and items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub order: Order,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Full name of the user who took the order
    pub created_by: Option<String>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub items: Vec<OrderItemDetail>,
}

// =============================================================================
// Payloads
// =============================================================================

/// Line item as submitted by staff
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
    pub size: Option<String>,
    pub customization: Option<String>,
}

/// Create order payload (raw; dates and status are checked by validation)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub delivery_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`; blank means no time
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub delivery_address: String,
    pub order_status: Option<String>,
    pub is_paid: Option<bool>,
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Partial order update payload
///
/// Absent fields are left untouched. For the nullable columns an explicit
/// `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_status: Option<String>,
    pub is_paid: Option<bool>,
    pub delivery_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_time: Option<Option<String>>,
    pub delivery_address: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub special_requirements: Option<Option<String>>,
}

// =============================================================================
// Validated commands
// =============================================================================

/// Validated line item
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub size: Option<String>,
    pub customization: Option<String>,
}

/// Delivery and status fields of a new order header
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryInfo {
    pub delivery_date: NaiveDate,
    pub delivery_time: Option<NaiveTime>,
    pub delivery_address: String,
    pub order_status: OrderStatus,
    pub is_paid: bool,
    pub special_requirements: Option<String>,
}

/// Validated order creation command
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub delivery: DeliveryInfo,
    pub items: Vec<NewOrderItem>,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub order_status: Option<OrderStatus>,
    pub is_paid: Option<bool>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<Option<NaiveTime>>,
    pub delivery_address: Option<String>,
    pub special_requirements: Option<Option<String>>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.order_status.is_none()
            && self.is_paid.is_none()
            && self.delivery_date.is_none()
            && self.delivery_time.is_none()
            && self.delivery_address.is_none()
            && self.special_requirements.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_display_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!("In Progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert!("InProgress".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: OrderUpdate = serde_json::from_str(r#"{"is_paid":true}"#).unwrap();
        assert_eq!(absent.delivery_time, None);

        let cleared: OrderUpdate = serde_json::from_str(r#"{"delivery_time":null}"#).unwrap();
        assert_eq!(cleared.delivery_time, Some(None));

        let set: OrderUpdate = serde_json::from_str(r#"{"delivery_time":"10:30"}"#).unwrap();
        assert_eq!(set.delivery_time, Some(Some("10:30".to_string())));
    }

    #[test]
    fn summary_flattens_header() {
        let summary = OrderSummary {
            order: Order {
                id: 1,
                customer_id: 2,
                user_id: Some(3),
                order_date: 0,
                delivery_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                delivery_time: None,
                delivery_address: "Port Louis".into(),
                order_status: OrderStatus::Ready,
                total_amount: 1000.0,
                is_paid: false,
                special_requirements: None,
            },
            customer_name: "Jane Doe".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["customer_name"], "Jane Doe");
        assert_eq!(json["order_status"], "Ready");
        assert_eq!(json["delivery_date"], "2025-06-01");
    }
}

//! Order validation
//!
//! Turns raw payloads into typed commands ([`NewOrder`], [`OrderChanges`]).

use chrono::{NaiveDate, NaiveTime};
use shared::models::{
    DeliveryInfo, NewOrder, NewOrderItem, OrderChanges, OrderCreate, OrderStatus, OrderUpdate,
};

use super::{FieldErrors, MAX_LABEL_LEN, MAX_NOTE_LEN, check_max_len, non_blank};

/// Upper bound for a single line quantity
pub const MAX_QUANTITY: i64 = 9999;

pub fn validate_order_create(input: &OrderCreate) -> FieldErrors {
    check_order_create(input).err().unwrap_or_default()
}

pub fn validate_order_update(input: &OrderUpdate) -> FieldErrors {
    check_order_update(input).err().unwrap_or_default()
}

/// Validate a create payload, producing the composition command
pub fn check_order_create(input: &OrderCreate) -> Result<NewOrder, FieldErrors> {
    let mut errors = FieldErrors::new();

    let customer_id = input.customer_id.filter(|id| *id > 0);
    if customer_id.is_none() {
        errors.add("customer_id", "Customer is required.");
    }

    if input.items.is_empty() {
        errors.add("items", "Product Type is required.");
    }
    let mut items = Vec::with_capacity(input.items.len());
    for (i, item) in input.items.iter().enumerate() {
        let product_id = item.product_id.filter(|id| *id > 0);
        if product_id.is_none() {
            errors.add(format!("items[{i}].product_id"), "Product Type is required.");
        }
        if item.quantity < 1 {
            errors.add(format!("items[{i}].quantity"), "Quantity must be at least 1.");
        } else if item.quantity > MAX_QUANTITY {
            errors.add(
                format!("items[{i}].quantity"),
                "Quantity must not exceed 9999.",
            );
        }
        check_max_len(
            &mut errors,
            &format!("items[{i}].size"),
            item.size.as_deref(),
            MAX_LABEL_LEN,
            "Size cannot exceed 50 characters.",
        );
        check_max_len(
            &mut errors,
            &format!("items[{i}].customization"),
            item.customization.as_deref(),
            MAX_NOTE_LEN,
            "Customization cannot exceed 500 characters.",
        );
        if let Some(product_id) = product_id {
            items.push(NewOrderItem {
                product_id,
                quantity: item.quantity,
                size: non_blank(item.size.as_deref()),
                customization: non_blank(item.customization.as_deref()),
            });
        }
    }

    let delivery_date = match non_blank(input.delivery_date.as_deref()) {
        None => {
            errors.add("delivery_date", "Delivery Date is required.");
            None
        }
        Some(raw) => {
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                errors.add("delivery_date", "Invalid Delivery Date format.");
            }
            parsed
        }
    };

    let delivery_time = match non_blank(input.delivery_time.as_deref()) {
        None => None,
        Some(raw) => {
            let parsed = parse_time(&raw);
            if parsed.is_none() {
                errors.add("delivery_time", "Invalid Delivery Time format.");
            }
            parsed
        }
    };

    let delivery_address = input.delivery_address.trim().to_string();
    if delivery_address.is_empty() {
        errors.add("delivery_address", "Delivery Address is required.");
    } else if delivery_address.chars().count() > MAX_NOTE_LEN {
        errors.add(
            "delivery_address",
            "Delivery Address cannot exceed 500 characters.",
        );
    }

    let order_status = match non_blank(input.order_status.as_deref()) {
        None => OrderStatus::default(),
        Some(raw) => raw.parse::<OrderStatus>().unwrap_or_else(|_| {
            errors.add("order_status", "Invalid order status selected.");
            OrderStatus::default()
        }),
    };

    check_max_len(
        &mut errors,
        "special_requirements",
        input.special_requirements.as_deref(),
        MAX_NOTE_LEN,
        "Special Requirements cannot exceed 500 characters.",
    );

    match (customer_id, delivery_date) {
        (Some(customer_id), Some(delivery_date)) if errors.is_empty() => Ok(NewOrder {
            customer_id,
            delivery: DeliveryInfo {
                delivery_date,
                delivery_time,
                delivery_address,
                order_status,
                is_paid: input.is_paid.unwrap_or(false),
                special_requirements: non_blank(input.special_requirements.as_deref()),
            },
            items,
        }),
        _ => Err(errors),
    }
}

/// Validate a partial update, producing typed changes
///
/// A blank `delivery_time` or `special_requirements` clears the value.
pub fn check_order_update(input: &OrderUpdate) -> Result<OrderChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut changes = OrderChanges {
        is_paid: input.is_paid,
        ..Default::default()
    };

    if let Some(raw) = &input.order_status {
        match raw.trim().parse::<OrderStatus>() {
            Ok(status) => changes.order_status = Some(status),
            Err(_) => errors.add("order_status", "Invalid order status selected."),
        }
    }

    if let Some(raw) = &input.delivery_date {
        if raw.trim().is_empty() {
            errors.add("delivery_date", "Delivery date is required.");
        } else {
            match parse_date(raw.trim()) {
                Some(date) => changes.delivery_date = Some(date),
                None => errors.add("delivery_date", "Invalid date format."),
            }
        }
    }

    if let Some(time) = &input.delivery_time {
        match non_blank(time.as_deref()) {
            None => changes.delivery_time = Some(None),
            Some(raw) => match parse_time(&raw) {
                Some(t) => changes.delivery_time = Some(Some(t)),
                None => errors.add("delivery_time", "Invalid time format."),
            },
        }
    }

    if let Some(raw) = &input.delivery_address {
        let address = raw.trim();
        if address.is_empty() {
            errors.add("delivery_address", "Delivery address is required.");
        } else if address.chars().count() > MAX_NOTE_LEN {
            errors.add(
                "delivery_address",
                "Delivery Address cannot exceed 500 characters.",
            );
        } else {
            changes.delivery_address = Some(address.to_string());
        }
    }

    if let Some(requirements) = &input.special_requirements {
        let value = non_blank(requirements.as_deref());
        check_max_len(
            &mut errors,
            "special_requirements",
            value.as_deref(),
            MAX_NOTE_LEN,
            "Special Requirements cannot exceed 500 characters.",
        );
        changes.special_requirements = Some(value);
    }

    errors.into_result().map(|_| changes)
}

/// `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `HH:MM` or `HH:MM:SS`
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

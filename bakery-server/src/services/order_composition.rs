//! Order Composition
//!
//! Creates an order header and its line items as one all-or-nothing unit.
//! Unit prices are resolved inside the transaction and stored as snapshots;
//! the header total is their exact sum.

use rust_decimal::Decimal;
use shared::models::NewOrder;
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;
use thiserror::Error;

use super::money::{line_total, to_decimal, to_f64};
use crate::audit_log;
use crate::auth::RequestContext;
use crate::db::repository::{RepoError, customer, order, product};
use crate::validation::order::MAX_QUANTITY;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Customer {0} not found")]
    CustomerNotFound(i64),

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: i64 },

    #[error("Product {0} not found")]
    InvalidProduct(i64),

    #[error("Amount for product {0} is out of range")]
    AmountOutOfRange(i64),

    #[error("Order persistence failed: {0}")]
    Persistence(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        OrderError::Persistence(err.to_string())
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Persistence(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::CustomerNotFound(id) => {
                AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", id)
            }
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::InvalidQuantity {
                product_id,
                quantity,
            } => AppError::new(ErrorCode::OrderInvalidQuantity)
                .with_detail("product_id", product_id)
                .with_detail("quantity", quantity),
            OrderError::InvalidProduct(id) => {
                AppError::new(ErrorCode::OrderInvalidProduct).with_detail("product_id", id)
            }
            OrderError::AmountOutOfRange(id) => AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Order total is too large to be recorded.",
            )
            .with_detail("product_id", id),
            OrderError::Persistence(msg) => {
                tracing::error!(error = %msg, "Order was not saved");
                AppError::database("Order was not saved. Please try again.")
            }
        }
    }
}

/// Create an order with its items, returning the new order id
///
/// `order_date` is now and the creator is the acting user. Nothing is written
/// unless every step succeeds.
pub async fn create_order(
    pool: &SqlitePool,
    ctx: &RequestContext,
    new_order: NewOrder,
) -> Result<i64, OrderError> {
    if new_order.items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    if let Some(item) = new_order
        .items
        .iter()
        .find(|item| !(1..=MAX_QUANTITY).contains(&item.quantity))
    {
        return Err(OrderError::InvalidQuantity {
            product_id: item.product_id,
            quantity: item.quantity,
        });
    }

    let mut tx = pool.begin().await?;

    if !customer::exists(&mut *tx, new_order.customer_id).await? {
        return Err(OrderError::CustomerNotFound(new_order.customer_id));
    }

    let mut unit_prices = Vec::with_capacity(new_order.items.len());
    let mut total = Decimal::ZERO;
    for item in &new_order.items {
        let price = product::find_price(&mut *tx, item.product_id)
            .await?
            .ok_or(OrderError::InvalidProduct(item.product_id))?;
        let unit = to_decimal(price).ok_or(OrderError::AmountOutOfRange(item.product_id))?;
        total = line_total(unit, item.quantity)
            .and_then(|line| total.checked_add(line))
            .ok_or(OrderError::AmountOutOfRange(item.product_id))?;
        unit_prices.push(to_f64(unit));
    }

    let order_id = order::insert_header(
        &mut tx,
        new_order.customer_id,
        ctx.user_id,
        shared::util::now_millis(),
        &new_order.delivery,
        to_f64(total),
    )
    .await?;

    for (item, price) in new_order.items.iter().zip(unit_prices) {
        order::insert_item(&mut tx, order_id, item, price).await?;
    }

    tx.commit().await?;

    audit_log!(
        ctx.user_id,
        "create",
        format!("order:{order_id}"),
        format!("{} items, total {}", new_order.items.len(), to_f64(total))
    );

    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product as product_repo;
    use crate::testing::{count, ctx, seeded};
    use chrono::NaiveDate;
    use shared::models::{DeliveryInfo, NewOrderItem, OrderStatus, ProductInput};

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            delivery_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            delivery_time: None,
            delivery_address: "12 Royal Road, Curepipe".into(),
            order_status: OrderStatus::New,
            is_paid: false,
            special_requirements: None,
        }
    }

    fn item(product_id: i64, quantity: i64) -> NewOrderItem {
        NewOrderItem {
            product_id,
            quantity,
            size: None,
            customization: None,
        }
    }

    #[tokio::test]
    async fn jane_doe_orders_two_chocolate_cakes() {
        let seed = seeded().await;
        let id = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, 2)],
            },
        )
        .await
        .unwrap();

        let detail = order::find_detail(seed.pool(), id).await.unwrap().unwrap();
        assert_eq!(detail.order.total_amount, 1000.0);
        assert_eq!(detail.order.order_status, OrderStatus::New);
        assert!(!detail.order.is_paid);
        assert_eq!(detail.order.user_id, Some(seed.staff.id));
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].item.quantity, 2);
        assert_eq!(detail.items[0].item.price, 500.0);
    }

    #[tokio::test]
    async fn total_is_sum_over_items() {
        let seed = seeded().await;
        let sponge = product_repo::create(
            seed.pool(),
            &ProductInput {
                cake_name: "Vanilla Sponge".into(),
                ..Default::default()
            },
            199.99,
        )
        .await
        .unwrap();

        let id = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, 1), item(sponge.id, 3)],
            },
        )
        .await
        .unwrap();

        assert_eq!(count(seed.pool(), "orders").await, 1);
        assert_eq!(count(seed.pool(), "order_items").await, 2);
        let header = order::find_by_id(seed.pool(), id).await.unwrap().unwrap();
        assert_eq!(header.total_amount, 1099.97);
    }

    #[tokio::test]
    async fn unknown_product_leaves_nothing_behind() {
        let seed = seeded().await;
        let err = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, 1), item(9999, 1)],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OrderError::InvalidProduct(9999)));
        assert_eq!(count(seed.pool(), "orders").await, 0);
        assert_eq!(count(seed.pool(), "order_items").await, 0);
    }

    #[tokio::test]
    async fn unknown_customer_rejected() {
        let seed = seeded().await;
        let err = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id + 100,
                delivery: delivery(),
                items: vec![item(seed.product.id, 1)],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OrderError::CustomerNotFound(_)));
        assert_eq!(count(seed.pool(), "orders").await, 0);
    }

    #[tokio::test]
    async fn empty_and_out_of_range_quantities_rejected() {
        let seed = seeded().await;
        let staff = ctx(&seed.staff);

        let empty = NewOrder {
            customer_id: seed.customer.id,
            delivery: delivery(),
            items: vec![],
        };
        assert!(matches!(
            create_order(seed.pool(), &staff, empty).await,
            Err(OrderError::EmptyOrder)
        ));

        for quantity in [0, MAX_QUANTITY + 1] {
            let order = NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, quantity)],
            };
            assert!(matches!(
                create_order(seed.pool(), &staff, order).await,
                Err(OrderError::InvalidQuantity { .. })
            ));
        }
        assert_eq!(count(seed.pool(), "orders").await, 0);
    }

    #[tokio::test]
    async fn later_price_change_keeps_snapshot() {
        let seed = seeded().await;
        let id = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, 2)],
            },
        )
        .await
        .unwrap();

        product_repo::update(
            seed.pool(),
            seed.product.id,
            &ProductInput {
                cake_name: "Chocolate Cake".into(),
                ..Default::default()
            },
            750.0,
        )
        .await
        .unwrap();

        let detail = order::find_detail(seed.pool(), id).await.unwrap().unwrap();
        assert_eq!(detail.items[0].item.price, 500.0);
        assert_eq!(detail.order.total_amount, 1000.0);
    }

    async fn priced_product(seed: &crate::testing::Seed, price: f64) -> i64 {
        // inserted directly, skipping product validation
        product_repo::create(
            seed.pool(),
            &ProductInput {
                cake_name: "Wedding Tower".into(),
                ..Default::default()
            },
            price,
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn overflowing_total_is_rejected() {
        let seed = seeded().await;
        let tower = priced_product(&seed, 5e25).await;

        let err = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(tower, MAX_QUANTITY)],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OrderError::AmountOutOfRange(id) if id == tower));
        assert_eq!(count(seed.pool(), "orders").await, 0);
        assert_eq!(count(seed.pool(), "order_items").await, 0);
    }

    #[tokio::test]
    async fn unrepresentable_price_is_never_recorded_as_zero() {
        let seed = seeded().await;
        let tower = priced_product(&seed, 1e30).await;

        let err = create_order(
            seed.pool(),
            &ctx(&seed.staff),
            NewOrder {
                customer_id: seed.customer.id,
                delivery: delivery(),
                items: vec![item(seed.product.id, 1), item(tower, 1)],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OrderError::AmountOutOfRange(id) if id == tower));
        assert_eq!(count(seed.pool(), "orders").await, 0);
        assert_eq!(count(seed.pool(), "order_items").await, 0);
    }

    #[test]
    fn errors_map_to_codes() {
        let err: AppError = OrderError::AmountOutOfRange(3).into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err: AppError = OrderError::InvalidProduct(5).into();
        assert_eq!(err.code, ErrorCode::OrderInvalidProduct);
        let err: AppError = OrderError::Persistence("disk full".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }
}

//! Order Repository
//!
//! Header and item writes take a connection so the composition service can
//! run them inside one transaction.

use super::{RepoError, RepoResult, SortDir, like_pattern, sort_column};
use shared::models::{
    DeliveryInfo, NewOrderItem, Order, OrderChanges, OrderDetail, OrderItemDetail, OrderSummary,
};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const ORDER_COLUMNS: &str = "o.id, o.customer_id, o.user_id, o.order_date, o.delivery_date, o.delivery_time, o.delivery_address, o.order_status, o.total_amount, o.is_paid, o.special_requirements";

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("order_date", "o.order_date"),
    ("order_id", "o.id"),
    ("delivery_date", "o.delivery_date"),
    ("order_status", "o.order_status"),
    ("total_amount", "o.total_amount"),
    ("customer_name", "c.full_name"),
];

fn summary_select() -> String {
    format!(
        "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name FROM orders o JOIN customers c ON c.id = o.customer_id"
    )
}

pub async fn find_all(
    pool: &SqlitePool,
    sort: Option<&str>,
    dir: SortDir,
) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{} ORDER BY {} {}, o.id {}",
        summary_select(),
        sort_column(sort, SORT_COLUMNS),
        dir.as_sql(),
        dir.as_sql()
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Case-insensitive match on customer name, status, address, order id or
/// delivery date (`YYYY-MM-DD` or `DD/MM/YYYY`)
pub async fn search(pool: &SqlitePool, term: &str) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{} WHERE c.full_name LIKE ?1 OR o.order_status LIKE ?1 OR o.delivery_address LIKE ?1 OR CAST(o.id AS TEXT) LIKE ?1 OR o.delivery_date LIKE ?1 OR strftime('%d/%m/%Y', o.delivery_date) LIKE ?1 ORDER BY o.order_date DESC, o.id DESC",
        summary_select()
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(like_pattern(term))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// A customer's orders, newest first
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<OrderSummary>> {
    let sql = format!(
        "{} WHERE o.customer_id = ? ORDER BY o.order_date DESC, o.id DESC",
        summary_select()
    );
    let rows = sqlx::query_as::<_, OrderSummary>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Header with customer contact, creator name and items
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS}, c.full_name AS customer_name, c.phone_number AS customer_phone, c.email AS customer_email, u.full_name AS created_by FROM orders o JOIN customers c ON c.id = o.customer_id LEFT JOIN users u ON u.id = o.user_id WHERE o.id = ?"
    );
    let detail = sqlx::query_as::<_, OrderDetail>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match detail {
        Some(mut detail) => {
            detail.items = find_items(pool, id).await?;
            Ok(Some(detail))
        }
        None => Ok(None),
    }
}

pub async fn find_items<'e>(
    db: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Vec<OrderItemDetail>> {
    let rows = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, oi.size, oi.customization, p.cake_name FROM order_items oi JOIN products p ON p.id = oi.product_id WHERE oi.order_id = ? ORDER BY oi.id ASC",
    )
    .bind(order_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Insert an order header, returning the generated id
pub async fn insert_header(
    conn: &mut SqliteConnection,
    customer_id: i64,
    user_id: i64,
    order_date: i64,
    delivery: &DeliveryInfo,
    total_amount: f64,
) -> RepoResult<i64> {
    let id = sqlx::query(
        "INSERT INTO orders (customer_id, user_id, order_date, delivery_date, delivery_time, delivery_address, order_status, total_amount, is_paid, special_requirements) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(customer_id)
    .bind(user_id)
    .bind(order_date)
    .bind(delivery.delivery_date)
    .bind(delivery.delivery_time)
    .bind(&delivery.delivery_address)
    .bind(delivery.order_status)
    .bind(total_amount)
    .bind(delivery.is_paid)
    .bind(&delivery.special_requirements)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Insert one line item with its unit price snapshot
pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    item: &NewOrderItem,
    price: f64,
) -> RepoResult<i64> {
    let id = sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, price, size, customization) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(price)
    .bind(&item.size)
    .bind(&item.customization)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Apply a partial update; only supplied fields change
pub async fn update(pool: &SqlitePool, id: i64, changes: &OrderChanges) -> RepoResult<Order> {
    let rows = sqlx::query(
        "UPDATE orders SET \
            order_status = COALESCE(?1, order_status), \
            is_paid = COALESCE(?2, is_paid), \
            delivery_date = COALESCE(?3, delivery_date), \
            delivery_time = CASE WHEN ?4 THEN ?5 ELSE delivery_time END, \
            delivery_address = COALESCE(?6, delivery_address), \
            special_requirements = CASE WHEN ?7 THEN ?8 ELSE special_requirements END \
         WHERE id = ?9",
    )
    .bind(changes.order_status)
    .bind(changes.is_paid)
    .bind(changes.delivery_date)
    .bind(changes.delivery_time.is_some())
    .bind(changes.delivery_time.flatten())
    .bind(&changes.delivery_address)
    .bind(changes.special_requirements.is_some())
    .bind(changes.special_requirements.clone().flatten())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; its items go with it
pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{customer, product, user};
    use chrono::{NaiveDate, NaiveTime};
    use shared::models::{CustomerInput, OrderStatus, ProductInput, UserRole};

    struct Fixture {
        db: DbService,
        customer_id: i64,
        product_id: i64,
        user_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let c = customer::create(
            &db.pool,
            &CustomerInput {
                full_name: "Jane Doe".into(),
                phone_number: "+230 5123 4567".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let p = product::create(
            &db.pool,
            &ProductInput {
                cake_name: "Chocolate Cake".into(),
                ..Default::default()
            },
            500.0,
        )
        .await
        .unwrap();
        let u = user::create(&db.pool, "staff1", "h", "Staff One", None, UserRole::Staff)
            .await
            .unwrap();
        Fixture {
            db,
            customer_id: c.id,
            product_id: p.id,
            user_id: u.id,
        }
    }

    fn delivery(date: &str) -> DeliveryInfo {
        DeliveryInfo {
            delivery_date: date.parse().unwrap(),
            delivery_time: NaiveTime::from_hms_opt(10, 30, 0),
            delivery_address: "12 Royal Road, Curepipe".into(),
            order_status: OrderStatus::New,
            is_paid: false,
            special_requirements: Some("Write 'Happy Birthday'".into()),
        }
    }

    async fn insert_order(f: &Fixture, date: &str, quantity: i64) -> i64 {
        let mut conn = f.db.pool.acquire().await.unwrap();
        let id = insert_header(
            &mut conn,
            f.customer_id,
            f.user_id,
            1_700_000_000_000,
            &delivery(date),
            500.0 * quantity as f64,
        )
        .await
        .unwrap();
        let item = NewOrderItem {
            product_id: f.product_id,
            quantity,
            size: Some("8 inch".into()),
            customization: None,
        };
        insert_item(&mut conn, id, &item, 500.0).await.unwrap();
        id
    }

    #[tokio::test]
    async fn detail_joins_customer_creator_and_items() {
        let f = fixture().await;
        let id = insert_order(&f, "2025-06-01", 2).await;

        let detail = find_detail(&f.db.pool, id).await.unwrap().unwrap();
        assert_eq!(detail.customer_name, "Jane Doe");
        assert_eq!(detail.customer_phone, "+230 5123 4567");
        assert_eq!(detail.created_by.as_deref(), Some("Staff One"));
        assert_eq!(detail.order.delivery_time, NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].cake_name, "Chocolate Cake");
        assert_eq!(detail.items[0].item.quantity, 2);

        assert!(find_detail(&f.db.pool, id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let f = fixture().await;
        let id = insert_order(&f, "2025-06-01", 1).await;

        let paid = update(
            &f.db.pool,
            id,
            &OrderChanges {
                is_paid: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.order_status, OrderStatus::New);
        assert!(paid.delivery_time.is_some());

        let ready = update(
            &f.db.pool,
            id,
            &OrderChanges {
                order_status: Some(OrderStatus::InProgress),
                delivery_time: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ready.order_status, OrderStatus::InProgress);
        assert!(ready.is_paid);
        assert_eq!(ready.delivery_time, None);
        assert_eq!(
            ready.special_requirements.as_deref(),
            Some("Write 'Happy Birthday'")
        );

        let moved = update(
            &f.db.pool,
            id,
            &OrderChanges {
                delivery_date: NaiveDate::from_ymd_opt(2025, 6, 3),
                special_requirements: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.delivery_date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert_eq!(moved.special_requirements, None);
    }

    #[tokio::test]
    async fn update_unknown_order_is_not_found() {
        let f = fixture().await;
        let result = update(
            &f.db.pool,
            42,
            &OrderChanges {
                is_paid: Some(true),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_matches_name_id_and_date_formats() {
        let f = fixture().await;
        let id = insert_order(&f, "2025-06-01", 1).await;

        assert_eq!(search(&f.db.pool, "jane").await.unwrap().len(), 1);
        assert_eq!(search(&f.db.pool, &id.to_string()).await.unwrap().len(), 1);
        assert_eq!(search(&f.db.pool, "2025-06-01").await.unwrap().len(), 1);
        assert_eq!(search(&f.db.pool, "01/06/2025").await.unwrap().len(), 1);
        assert!(search(&f.db.pool, "nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_sorting_and_by_customer() {
        let f = fixture().await;
        insert_order(&f, "2025-06-05", 1).await;
        insert_order(&f, "2025-06-01", 3).await;

        let by_total = find_all(&f.db.pool, Some("total_amount"), SortDir::Desc)
            .await
            .unwrap();
        assert_eq!(by_total[0].order.total_amount, 1500.0);

        let by_date = find_all(&f.db.pool, Some("delivery_date"), SortDir::Asc)
            .await
            .unwrap();
        assert_eq!(
            by_date[0].order.delivery_date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );

        let mine = find_by_customer(&f.db.pool, f.customer_id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(find_by_customer(&f.db.pool, f.customer_id + 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_items() {
        let f = fixture().await;
        let id = insert_order(&f, "2025-06-01", 1).await;

        assert!(delete(&f.db.pool, id).await.unwrap());
        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&f.db.pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
        assert!(!delete(&f.db.pool, id).await.unwrap());
    }
}

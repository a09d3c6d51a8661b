//! Product Repository

use super::{RepoError, RepoResult, SortDir, like_pattern, sort_column};
use shared::models::{Product, ProductInput};
use sqlx::{SqliteExecutor, SqlitePool};

const PRODUCT_SELECT: &str = "SELECT id, cake_name, base_price, category, description, custom_available, size_options FROM products";

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("cake_name", "cake_name"),
    ("product_id", "id"),
    ("base_price", "base_price"),
    ("category", "category"),
];

pub async fn find_all(
    pool: &SqlitePool,
    sort: Option<&str>,
    dir: SortDir,
) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} ORDER BY {} {}",
        sort_column(sort, SORT_COLUMNS),
        dir.as_sql()
    );
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Case-insensitive match on name, category or description
pub async fn search(pool: &SqlitePool, term: &str) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "{PRODUCT_SELECT} WHERE cake_name LIKE ?1 OR category LIKE ?1 OR description LIKE ?1 ORDER BY id ASC"
    );
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(like_pattern(term))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Current base price, `None` if the product does not exist
pub async fn find_price<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<f64>> {
    let price = sqlx::query_scalar::<_, f64>("SELECT base_price FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(price)
}

pub async fn create(pool: &SqlitePool, data: &ProductInput, base_price: f64) -> RepoResult<Product> {
    let id = sqlx::query(
        "INSERT INTO products (cake_name, base_price, category, description, custom_available, size_options) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.cake_name)
    .bind(base_price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.custom_available)
    .bind(&data.size_options)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &ProductInput,
    base_price: f64,
) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE products SET cake_name = ?, base_price = ?, category = ?, description = ?, custom_available = ?, size_options = ? WHERE id = ?",
    )
    .bind(&data.cake_name)
    .bind(base_price)
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.custom_available)
    .bind(&data.size_options)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Number of order items referencing the product
pub async fn count_order_items<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_items WHERE product_id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn cake(name: &str, category: &str) -> ProductInput {
        ProductInput {
            cake_name: name.into(),
            category: Some(category.into()),
            custom_available: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_price_lookup() {
        let db = DbService::in_memory().await.unwrap();
        let p = create(&db.pool, &cake("Chocolate Cake", "Birthday"), 500.0)
            .await
            .unwrap();
        assert!(p.custom_available);
        assert_eq!(find_price(&db.pool, p.id).await.unwrap(), Some(500.0));
        assert_eq!(find_price(&db.pool, p.id + 1).await.unwrap(), None);

        let p = update(&db.pool, p.id, &cake("Chocolate Cake", "Birthday"), 650.0)
            .await
            .unwrap();
        assert_eq!(p.base_price, 650.0);
    }

    #[tokio::test]
    async fn negative_price_rejected_by_schema() {
        let db = DbService::in_memory().await.unwrap();
        let result = create(&db.pool, &cake("Free Cake", "Misc"), -1.0).await;
        assert!(matches!(result, Err(RepoError::Database(_))));
    }

    #[tokio::test]
    async fn search_and_sort() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, &cake("Vanilla Sponge", "Classic"), 300.0)
            .await
            .unwrap();
        create(&db.pool, &cake("Black Forest", "Wedding"), 900.0)
            .await
            .unwrap();

        let by_price = find_all(&db.pool, Some("base_price"), SortDir::Desc)
            .await
            .unwrap();
        assert_eq!(by_price[0].cake_name, "Black Forest");

        let hits = search(&db.pool, "WEDDING").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].cake_name, "Black Forest");
    }
}

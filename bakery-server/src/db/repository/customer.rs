//! Customer Repository

use super::{RepoError, RepoResult, SortDir, like_pattern, sort_column};
use shared::models::{Customer, CustomerInput};
use sqlx::{SqliteExecutor, SqlitePool};

const CUSTOMER_SELECT: &str =
    "SELECT id, full_name, phone_number, email, address, notes, date_added FROM customers";

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("full_name", "full_name"),
    ("customer_id", "id"),
    ("phone_number", "phone_number"),
    ("email", "email"),
    ("date_added", "date_added"),
];

pub async fn find_all(
    pool: &SqlitePool,
    sort: Option<&str>,
    dir: SortDir,
) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "{CUSTOMER_SELECT} ORDER BY {} {}",
        sort_column(sort, SORT_COLUMNS),
        dir.as_sql()
    );
    let rows = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Case-insensitive match on name, phone, email or address
pub async fn search(pool: &SqlitePool, term: &str) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE full_name LIKE ?1 OR phone_number LIKE ?1 OR email LIKE ?1 OR address LIKE ?1 ORDER BY full_name ASC"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(like_pattern(term))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn exists<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM customers WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn create(pool: &SqlitePool, data: &CustomerInput) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO customers (full_name, phone_number, email, address, notes, date_added) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.full_name)
    .bind(&data.phone_number)
    .bind(&data.email)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &CustomerInput) -> RepoResult<Customer> {
    let rows = sqlx::query(
        "UPDATE customers SET full_name = ?, phone_number = ?, email = ?, address = ?, notes = ? WHERE id = ?",
    )
    .bind(&data.full_name)
    .bind(&data.phone_number)
    .bind(&data.email)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

/// Number of orders referencing the customer
pub async fn count_orders<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

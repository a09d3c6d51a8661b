//! User Repository

use super::{RepoError, RepoResult, SortDir, sort_column};
use shared::models::{User, UserRole};
use sqlx::{SqliteExecutor, SqlitePool};

const USER_SELECT: &str = "SELECT id, username, full_name, email, role, last_login FROM users";

#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

const SORT_COLUMNS: &[(&str, &str)] = &[
    ("username", "username"),
    ("user_id", "id"),
    ("full_name", "full_name"),
    ("email", "email"),
    ("role", "role"),
    ("last_login", "last_login"),
];

pub async fn find_all(
    pool: &SqlitePool,
    sort: Option<&str>,
    dir: SortDir,
) -> RepoResult<Vec<User>> {
    let sql = format!(
        "{USER_SELECT} ORDER BY {} {}",
        sort_column(sort, SORT_COLUMNS),
        dir.as_sql()
    );
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// User plus stored password hash, for login only
pub async fn find_credentials(
    pool: &SqlitePool,
    username: &str,
) -> RepoResult<Option<(User, String)>> {
    let row = sqlx::query_as::<_, UserWithHash>(
        "SELECT id, username, full_name, email, role, last_login, password_hash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| (r.user, r.password_hash)))
}

/// Whether `username` is held by any account other than `exclude_id`
pub async fn username_taken(
    pool: &SqlitePool,
    username: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let n = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE username = ?1 AND (?2 IS NULL OR id <> ?2)",
    )
    .bind(username)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(n > 0)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    full_name: &str,
    email: Option<&str>,
    role: UserRole,
) -> RepoResult<User> {
    let id = sqlx::query(
        "INSERT INTO users (username, password_hash, full_name, email, role) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(full_name)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Replace a user's profile; `password_hash = None` keeps the current password
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    username: &str,
    password_hash: Option<&str>,
    full_name: &str,
    email: Option<&str>,
    role: UserRole,
) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET username = ?1, password_hash = COALESCE(?2, password_hash), full_name = ?3, email = ?4, role = ?5 WHERE id = ?6",
    )
    .bind(username)
    .bind(password_hash)
    .bind(full_name)
    .bind(email)
    .bind(role)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn touch_last_login(pool: &SqlitePool, id: i64, at_millis: i64) -> RepoResult<()> {
    sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
        .bind(at_millis)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

//! Database Module
//!
//! Handles the SQLite connection pool, migrations and first-run seeding

pub mod repository;

use crate::auth::password;
use crate::config::BootstrapAdmin;
use shared::AppError;
use shared::models::UserRole;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `database_url` with WAL mode and run
    /// migrations
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(5000))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the full schema, for tests and tooling
    ///
    /// A single never-recycled connection keeps the memory database alive for
    /// the lifetime of the pool.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Create the first Admin account when the users table is empty
    ///
    /// Returns `true` if an account was created.
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> Result<bool, AppError> {
        if repository::user::count(&self.pool).await? > 0 {
            return Ok(false);
        }

        let hash = password::hash_password(&admin.password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        let user = repository::user::create(
            &self.pool,
            &admin.username,
            &hash,
            &admin.username,
            None,
            UserRole::Admin,
        )
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin account created");
        Ok(true)
    }
}

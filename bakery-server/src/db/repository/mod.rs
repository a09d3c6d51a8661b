//! Repository Module
//!
//! Parameterized SQLite queries per entity. Functions take either the pool or
//! an open transaction (`&mut *tx`), so services can compose them atomically.

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::ForeignKey(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            // usernames are the only unique column
            RepoError::Duplicate(msg) => {
                tracing::warn!(error = %msg, "Rejected duplicate username");
                AppError::new(ErrorCode::UsernameExists)
            }
            RepoError::ForeignKey(msg) => {
                tracing::warn!(error = %msg, "Rejected write violating a foreign key");
                AppError::invalid_request("Referenced record does not exist or is still in use")
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database operation failed");
                AppError::database("A database error occurred. Please try again later.")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Direction for whitelisted list sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    /// Parse `asc`/`desc` (case-insensitive), falling back to `default`
    pub fn parse_or(raw: Option<&str>, default: SortDir) -> SortDir {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => SortDir::Asc,
            Some("desc") => SortDir::Desc,
            _ => default,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Resolve a client-supplied sort key against a whitelist of `(key, column)`
/// pairs, falling back to the first entry.
pub(crate) fn sort_column(raw: Option<&str>, allowed: &[(&str, &'static str)]) -> &'static str {
    raw.and_then(|key| allowed.iter().find(|(k, _)| *k == key))
        .or_else(|| allowed.first())
        .map(|(_, column)| *column)
        .unwrap_or("id")
}

/// `%term%` pattern for LIKE searches (SQLite LIKE is ASCII case-insensitive)
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

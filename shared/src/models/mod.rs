//! Data models
//!
//! Shared between bakery-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

// Re-exports
pub use customer::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use user::*;

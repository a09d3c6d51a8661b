//! Shared types for the bakery back-office
//!
//! Error codes and API envelopes, domain models and small utilities used by
//! the server and by API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};

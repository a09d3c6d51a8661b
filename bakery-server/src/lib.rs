//! Sweet Creations back-office server
//!
//! # Module layout
//!
//! ```text
//! bakery-server/src/
//! ├── config.rs      # environment configuration
//! ├── logger.rs      # tracing setup, audit/security log macros
//! ├── state.rs       # shared handler state
//! ├── server.rs      # startup and HTTP serving
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── validation/    # field rules per entity
//! ├── services/      # order composition, guarded deletes, reports
//! ├── auth/          # argon2 passwords, JWT, request context
//! └── api/           # HTTP routes and handlers
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod logger;
pub mod server;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{JwtService, RequestContext};
pub use config::Config;
pub use db::DbService;
pub use logger::{init_logger, init_logger_with_file};
pub use server::Server;
pub use state::ServerState;

pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

//! Authentication
//!
//! - [`JwtService`] - token issue / validation
//! - [`RequestContext`] - acting identity
//! - [`require_auth`] / [`require_admin`] - middleware
//! - [`password`] - argon2 hashing

pub mod context;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use context::RequestContext;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};

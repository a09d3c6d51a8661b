//! Business services
//!
//! Order composition, guarded deletes and report rollups sit here, above the
//! repositories and below the HTTP handlers.

pub mod money;
pub mod order_composition;
pub mod referential_guard;
pub mod reporting;

pub use order_composition::{OrderError, create_order};
pub use referential_guard::DeleteOutcome;

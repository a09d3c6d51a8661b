//! Product Model

use serde::{Deserialize, Serialize};

/// Product (cake) entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub cake_name: String,
    pub base_price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub custom_available: bool,
    /// Free text, e.g. "6 inch, 8 inch, 10 inch"
    pub size_options: Option<String>,
}

/// Create/update product payload (updates replace every field)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub cake_name: String,
    pub base_price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub custom_available: bool,
    pub size_options: Option<String>,
}

//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    /// Mauritius mobile number, `+230 5XXX XXXX`
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Unix millis
    pub date_added: i64,
}

/// Create/update customer payload (updates replace every field)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

//! Unified error codes for the bakery back-office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Order errors
//! - 5xxx: Customer errors
//! - 6xxx: Product errors
//! - 7xxx: Report errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Admin accounts cannot be deleted
    CannotDeleteAdmin = 2005,
    /// Users cannot delete their own account
    CannotDeleteSelf = 2006,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Username already taken
    UsernameExists = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Delivered orders are kept for the record
    OrderDelivered = 4003,
    /// Order item references an unknown product
    OrderInvalidProduct = 4004,
    /// Order item quantity outside the allowed range
    OrderInvalidQuantity = 4005,

    // ==================== 5xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 5001,
    /// Customer still has orders
    CustomerHasOrders = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price is invalid
    ProductInvalidPrice = 6002,
    /// Product is referenced by order items
    ProductInUse = 6003,

    // ==================== 7xxx: Report ====================
    /// Report date range is inverted
    ReportInvalidRange = 7001,
    /// Report month is not YYYY-MM
    ReportInvalidMonth = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::CannotDeleteAdmin => "Admin accounts cannot be deleted",
            Self::CannotDeleteSelf => "You cannot delete your own account",

            Self::UserNotFound => "User not found",
            Self::UsernameExists => {
                "Username already exists. Please choose a different username."
            }

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order must contain at least one item",
            Self::OrderDelivered => "Delivered orders cannot be deleted",
            Self::OrderInvalidProduct => "Order item references an unknown product",
            Self::OrderInvalidQuantity => "Order item quantity is out of range",

            Self::CustomerNotFound => "Customer not found",
            Self::CustomerHasOrders => "Cannot delete customer with existing orders",

            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Product price is invalid",
            Self::ProductInUse => "Cannot delete product used in existing orders",

            Self::ReportInvalidRange => "Start date must not be after end date",
            Self::ReportInvalidMonth => "Invalid month format provided. Please use YYYY-MM.",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "A database error occurred. Please try again.",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2005 => Ok(ErrorCode::CannotDeleteAdmin),
            2006 => Ok(ErrorCode::CannotDeleteSelf),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::UsernameExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderDelivered),
            4004 => Ok(ErrorCode::OrderInvalidProduct),
            4005 => Ok(ErrorCode::OrderInvalidQuantity),

            // Customer
            5001 => Ok(ErrorCode::CustomerNotFound),
            5002 => Ok(ErrorCode::CustomerHasOrders),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductInUse),

            // Report
            7001 => Ok(ErrorCode::ReportInvalidRange),
            7002 => Ok(ErrorCode::ReportInvalidMonth),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::CannotDeleteSelf.code(), 2006);
        assert_eq!(ErrorCode::UsernameExists.code(), 3002);
        assert_eq!(ErrorCode::OrderDelivered.code(), 4003);
        assert_eq!(ErrorCode::CustomerHasOrders.code(), 5002);
        assert_eq!(ErrorCode::ProductInUse.code(), 6003);
        assert_eq!(ErrorCode::ReportInvalidMonth.code(), 7002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrips_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::CannotDeleteAdmin,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::UserNotFound,
            ErrorCode::UsernameExists,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderEmpty,
            ErrorCode::OrderDelivered,
            ErrorCode::OrderInvalidProduct,
            ErrorCode::OrderInvalidQuantity,
            ErrorCode::CustomerNotFound,
            ErrorCode::CustomerHasOrders,
            ErrorCode::ProductNotFound,
            ErrorCode::ProductInvalidPrice,
            ErrorCode::ProductInUse,
            ErrorCode::ReportInvalidRange,
            ErrorCode::ReportInvalidMonth,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ConfigError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::CustomerHasOrders).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("6003").unwrap();
        assert_eq!(code, ErrorCode::ProductInUse);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}

//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are computed as `Decimal` and stored/serialized as `f64` rounded
//! to 2 decimal places (half-up).

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// `None` for NaN, infinities and values outside the `Decimal` range.
#[inline]
pub fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an f64 amount to 2 decimal places
///
/// Values `Decimal` cannot represent are returned unchanged.
#[inline]
pub fn round2(value: f64) -> f64 {
    to_decimal(value).map(to_f64).unwrap_or(value)
}

/// `unit_price × quantity`, exact; `None` on overflow
pub fn line_total(unit_price: Decimal, quantity: i64) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: f64) -> Decimal {
        to_decimal(value).unwrap()
    }

    #[test]
    fn sums_without_float_drift() {
        let total: Decimal = [0.1, 0.2]
            .into_iter()
            .filter_map(|p| line_total(dec(p), 1))
            .sum();
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(333.333333), 333.33);
        assert_eq!(to_f64(line_total(dec(500.0), 2).unwrap()), 1000.0);
    }

    #[test]
    fn unrepresentable_amounts_are_not_zeroed() {
        assert_eq!(to_decimal(1e30), None);
        assert_eq!(to_decimal(f64::NAN), None);
        assert_eq!(round2(1e30), 1e30);
    }

    #[test]
    fn line_total_reports_overflow() {
        assert_eq!(line_total(dec(5e25), 9999), None);
        assert_eq!(line_total(Decimal::MAX, 2), None);
        assert_eq!(
            line_total(Decimal::new(9_999_999_999, 2), 9999),
            Some(Decimal::new(99_989_999_990_001, 2))
        );
    }
}

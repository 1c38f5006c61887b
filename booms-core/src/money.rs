//! FCFA-only currency discipline and decimal helpers.
//!
//! Every monetary field in this crate is a `BigDecimal`. Binary floats
//! never appear on a money path (spec.md §9's Design Note).

use crate::errors::{BoomsError, BoomsResult};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Scale used for client-facing/ledger amounts (2 decimal places).
pub const VALUE_SCALE: i64 = 2;
/// Scale used for the palier accumulator (spec.md §3/§4.2).
pub const ACCUMULATOR_SCALE: i64 = 6;
/// Scale used for the raw, high-precision social-value accumulation.
pub const RAW_SCALE: i64 = 18;

pub fn round_value(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale(VALUE_SCALE)
}

pub fn round_accumulator(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale(ACCUMULATOR_SCALE)
}

/// Rounds `value` to the nearest whole unit, e.g. recomputing a palier
/// level from `applied_micro_value / micro_unit` (spec.md §4.2's decay
/// step). Falls back to 0 if the rounded value doesn't fit an `i32`.
pub fn round_to_i32(value: &BigDecimal) -> i32 {
    value.with_scale(0).to_string().parse().unwrap_or(0)
}

pub fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

pub fn decimal(literal: &str) -> BigDecimal {
    BigDecimal::from_str(literal).expect("literal must be a valid decimal")
}

/// Normalizes a free-form currency string to the single accepted
/// currency, FCFA. Anything else is rejected (spec.md §4.3, Non-goals).
pub fn normalize_currency(input: &str) -> BoomsResult<&'static str> {
    let trimmed = input.trim();
    let accepted = ["FCFA", "XOF", "CFA", "Franc CFA", "F CFA"];
    if accepted.iter().any(|c| c.eq_ignore_ascii_case(trimmed)) {
        Ok("FCFA")
    } else {
        Err(BoomsError::UnsupportedCurrency(input.to_string()))
    }
}

/// Clamps `value` to the inclusive range `[lo, hi]`.
pub fn clamp(value: BigDecimal, lo: &BigDecimal, hi: &BigDecimal) -> BigDecimal {
    if &value < lo {
        lo.clone()
    } else if &value > hi {
        hi.clone()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_fcfa_aliases() {
        for alias in ["FCFA", "xof", "CFA", "Franc CFA", "f cfa"] {
            assert_eq!(normalize_currency(alias).unwrap(), "FCFA");
        }
    }

    #[test]
    fn rejects_other_currencies() {
        assert!(normalize_currency("USD").is_err());
        assert!(normalize_currency("EUR").is_err());
    }

    #[test]
    fn round_to_i32_rounds_to_nearest_unit() {
        assert_eq!(round_to_i32(&decimal("2.4")), 2);
        assert_eq!(round_to_i32(&decimal("2.6")), 3);
        assert_eq!(round_to_i32(&decimal("0")), 0);
    }

    #[test]
    fn clamp_bounds_both_ends() {
        let lo = decimal("10");
        let hi = decimal("1000");
        assert_eq!(clamp(decimal("5"), &lo, &hi), lo);
        assert_eq!(clamp(decimal("5000"), &lo, &hi), hi);
        assert_eq!(clamp(decimal("500"), &lo, &hi), decimal("500"));
    }
}

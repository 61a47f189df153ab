//! ABNT NBR 5891 rounding for currency values
//!
//! All monetary output of the issuance core is rounded to two fractional
//! digits with this engine. Inputs are first normalized to six fractional
//! digits using banker's rounding, which keeps upstream arithmetic noise
//! from reaching the ABNT rule.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Rounds a decimal value to two fractional digits per ABNT NBR 5891.
///
/// The rule, applied to the digits after the second fractional place:
/// - anything beyond the third digit, or a third digit above five,
///   rounds the cent up;
/// - a third digit below five truncates;
/// - a lone third digit of exactly five rounds half to even at the cent.
///
/// Sign-preserving: negative values round symmetrically, zero stays zero.
pub fn round_abnt(value: Decimal) -> Decimal {
    let normalized = value
        .round_dp_with_strategy(6, RoundingStrategy::MidpointNearestEven)
        .normalize();
    if normalized.scale() <= 2 {
        return normalized;
    }

    let negative = normalized.is_sign_negative();
    let abs = normalized.abs();

    let base = abs.trunc_with_scale(2);
    let scaled = abs * dec!(1000);
    let third_digit = scaled.trunc() % dec!(10);
    let rest = scaled - scaled.trunc();

    let rounded = if third_digit > dec!(5) || !rest.is_zero() {
        base + dec!(0.01)
    } else if third_digit < dec!(5) {
        base
    } else {
        // Exactly half a cent: keep an even cent digit, bump an odd one.
        let cent_digit = (base * dec!(100)).trunc() % dec!(10);
        if (cent_digit % dec!(2)).is_zero() {
            base
        } else {
            base + dec!(0.01)
        }
    };

    if negative {
        -rounded
    } else {
        rounded
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounding_is_idempotent(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..7u32) {
            let value = Decimal::new(mantissa, scale);
            let once = round_abnt(value);
            prop_assert_eq!(round_abnt(once), once);
        }

        #[test]
        fn output_has_at_most_two_fractional_digits(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..7u32) {
            let value = Decimal::new(mantissa, scale);
            prop_assert!(round_abnt(value).scale() <= 2);
        }

        #[test]
        fn rounding_is_sign_symmetric(mantissa in 0i64..1_000_000_000i64, scale in 0u32..7u32) {
            let value = Decimal::new(mantissa, scale);
            prop_assert_eq!(round_abnt(-value), -round_abnt(value));
        }

        #[test]
        fn rounding_moves_the_value_less_than_a_cent(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..7u32) {
            let value = Decimal::new(mantissa, scale);
            let diff = (round_abnt(value) - value).abs();
            prop_assert!(diff < Decimal::new(1, 2));
        }
    }
}

//! Property-Based Test Generators
//!
//! Proptest strategies that maintain the fiscal domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use fiscal_kernel::{MonetaryAmount, TaxRate};

/// Strategy for non-negative amounts in centavos, up to one million BRL
pub fn amount_centavos_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy for monetary amounts with two fractional digits
pub fn monetary_amount_strategy() -> impl Strategy<Value = MonetaryAmount> {
    amount_centavos_strategy().prop_map(|centavos| MonetaryAmount::new(Decimal::new(centavos, 2)))
}

/// Strategy for raw amounts with up to six fractional digits, the
/// engine's full internal precision
pub fn unrounded_amount_strategy() -> impl Strategy<Value = MonetaryAmount> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..7u32)
        .prop_map(|(mantissa, scale)| MonetaryAmount::new(Decimal::new(mantissa, scale)))
}

/// Strategy for ISS rates between 0 and the 5% municipal ceiling, in
/// basis points of a percent
pub fn iss_rate_strategy() -> impl Strategy<Value = TaxRate> {
    (0u32..=500u32).prop_map(|bps| {
        TaxRate::new(Decimal::new(i64::from(bps), 4)).expect("non-negative rate")
    })
}

//! ISS tax calculation
//!
//! Composes the kernel's ABNT rounding: base and deductions are rounded
//! on their own before use, the ISS value is derived from the rounded
//! base, and the net value from the three rounded components. Every
//! field of the returned breakdown is final; nothing downstream rounds
//! again.

use serde::{Deserialize, Serialize};

use fiscal_kernel::{ComputationError, MonetaryAmount, TaxRate};

/// The computed, fully rounded tax decomposition of one invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub base_value: MonetaryAmount,
    pub iss_rate: TaxRate,
    pub iss_value: MonetaryAmount,
    pub deductions: MonetaryAmount,
    pub net_value: MonetaryAmount,
}

/// ISS owed on a base amount: full-precision product, then ABNT rounding.
///
/// 86.06 at 5% is 4.303, which rounds to 4.30.
pub fn calculate_iss(base: MonetaryAmount, rate: TaxRate) -> MonetaryAmount {
    rate.apply(&base).rounded()
}

/// Net value after deductions and ISS, ABNT-rounded
pub fn calculate_net_value(
    base: MonetaryAmount,
    deductions: MonetaryAmount,
    iss: MonetaryAmount,
) -> MonetaryAmount {
    (base - deductions - iss).rounded()
}

/// Computes the full breakdown for an invoice.
///
/// Sign validation happens here, not in the primitives above: the spec
/// keeps `calculate_iss`/`calculate_net_value` sign-agnostic.
pub fn calculate_tax_values(
    base: MonetaryAmount,
    rate: TaxRate,
    deductions: MonetaryAmount,
) -> Result<TaxBreakdown, ComputationError> {
    if base.is_negative() {
        return Err(ComputationError::NegativeAmount("base_value"));
    }
    if deductions.is_negative() {
        return Err(ComputationError::NegativeAmount("deductions"));
    }

    let base_value = base.rounded();
    let deductions = deductions.rounded();
    if deductions > base_value {
        return Err(ComputationError::DeductionsExceedBase {
            base: base_value.to_wire(),
            deductions: deductions.to_wire(),
        });
    }

    let iss_value = calculate_iss(base_value, rate);
    let net_value = calculate_net_value(base_value, deductions, iss_value);

    Ok(TaxBreakdown {
        base_value,
        iss_rate: rate,
        iss_value,
        deductions,
        net_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: rust_decimal::Decimal) -> MonetaryAmount {
        MonetaryAmount::new(value)
    }

    fn rate(value: rust_decimal::Decimal) -> TaxRate {
        TaxRate::new(value).unwrap()
    }

    #[test]
    fn test_iss_examples() {
        assert_eq!(
            calculate_iss(amount(dec!(86.06)), rate(dec!(0.05))),
            amount(dec!(4.30))
        );
        assert_eq!(
            calculate_iss(amount(dec!(309.75)), rate(dec!(0.05))),
            amount(dec!(15.49))
        );
    }

    #[test]
    fn test_breakdown_fields_are_final() {
        let breakdown = calculate_tax_values(
            amount(dec!(309.7501)),
            rate(dec!(0.05)),
            MonetaryAmount::zero(),
        )
        .unwrap();

        // Base is rounded on its own before the ISS derivation.
        assert_eq!(breakdown.base_value, amount(dec!(309.76)));
        assert_eq!(breakdown.iss_value, amount(dec!(15.49)));
        assert_eq!(breakdown.net_value, amount(dec!(294.27)));
        assert_eq!(breakdown.deductions, MonetaryAmount::zero());
    }

    #[test]
    fn test_breakdown_with_deductions() {
        let breakdown = calculate_tax_values(
            amount(dec!(1000.00)),
            rate(dec!(0.02)),
            amount(dec!(150.004)),
        )
        .unwrap();

        assert_eq!(breakdown.deductions, amount(dec!(150.00)));
        assert_eq!(breakdown.iss_value, amount(dec!(20.00)));
        assert_eq!(breakdown.net_value, amount(dec!(830.00)));
    }

    #[test]
    fn test_negative_inputs_fail_fast() {
        assert_eq!(
            calculate_tax_values(amount(dec!(-1)), rate(dec!(0.05)), MonetaryAmount::zero())
                .unwrap_err(),
            ComputationError::NegativeAmount("base_value")
        );
        assert_eq!(
            calculate_tax_values(amount(dec!(10)), rate(dec!(0.05)), amount(dec!(-1)))
                .unwrap_err(),
            ComputationError::NegativeAmount("deductions")
        );
    }

    #[test]
    fn test_deductions_above_base_fail() {
        assert!(matches!(
            calculate_tax_values(amount(dec!(10)), rate(dec!(0.05)), amount(dec!(20))),
            Err(ComputationError::DeductionsExceedBase { .. })
        ));
    }
}

//! Monetary types with precise decimal arithmetic
//!
//! All currency amounts in the issuance core are BRL and flow through
//! these types. rust_decimal keeps the arithmetic free of binary
//! floating-point error; [`round_abnt`] produces the two-digit values
//! that reach the wire.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::ComputationError;
use crate::rounding::round_abnt;

/// A currency amount, carried at up to six fractional digits internally
/// and rounded to exactly two for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    /// Creates an amount from a decimal value
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from integer centavos
    pub fn from_centavos(centavos: i64) -> Self {
        Self(Decimal::new(centavos, 2))
    }

    /// Creates an amount from a binary float, rejecting non-finite input
    pub fn try_from_f64(value: f64) -> Result<Self, ComputationError> {
        if !value.is_finite() {
            return Err(ComputationError::NonFinite(value.to_string()));
        }
        Decimal::from_f64_retain(value)
            .map(Self)
            .ok_or_else(|| ComputationError::NonFinite(value.to_string()))
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the raw decimal value
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Applies ABNT NBR 5891 rounding to two fractional digits
    pub fn rounded(&self) -> Self {
        Self(round_abnt(self.0))
    }

    /// Renders the amount with exactly two fractional digits for XML
    pub fn to_wire(&self) -> String {
        let mut value = self.0.round_dp(2);
        value.rescale(2);
        value.to_string()
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}", self.to_wire())
    }
}

impl From<Decimal> for MonetaryAmount {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for MonetaryAmount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for MonetaryAmount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for MonetaryAmount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A fractional service-tax rate (0.05 for 5%).
///
/// Municipal law caps ISS at 5%, but the ceiling is the caller's rule to
/// enforce; construction only rejects negative rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a rate from a fractional decimal value
    pub fn new(value: Decimal) -> Result<Self, ComputationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ComputationError::NegativeRate);
        }
        Ok(Self(value))
    }

    /// Creates a rate from a percentage (5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Result<Self, ComputationError> {
        Self::new(percentage / dec!(100))
    }

    /// Returns the rate as a fractional decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Applies this rate to an amount at full precision, without rounding
    pub fn apply(&self, amount: &MonetaryAmount) -> MonetaryAmount {
        MonetaryAmount::new(amount.amount() * self.0)
    }

    /// Renders the rate as a percentage with exactly four fractional
    /// digits for XML (0.05 -> "5.0000")
    pub fn to_wire_percentage(&self) -> String {
        let mut pct = (self.0 * dec!(100)).round_dp(4);
        pct.rescale(4);
        pct.to_string()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_wire_percentage())
    }
}

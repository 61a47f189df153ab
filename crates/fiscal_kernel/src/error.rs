//! Kernel error types used across the issuance core

use thiserror::Error;

/// Arithmetic input outside the fiscal domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComputationError {
    #[error("Non-finite value: {0}")]
    NonFinite(String),

    #[error("Negative amount not allowed for {0}")]
    NegativeAmount(&'static str),

    #[error("Negative tax rate not allowed")]
    NegativeRate,

    #[error("Deductions {deductions} exceed base amount {base}")]
    DeductionsExceedBase { base: String, deductions: String },
}

/// Malformed or missing required input, raised before any network activity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid tax id: expected 11 (CPF) or 14 (CNPJ) digits, got {digits} in {value:?}")]
    InvalidTaxId { value: String, digits: usize },

    #[error("Invalid CNPJ: expected 14 digits, got {digits} in {value:?}")]
    InvalidCnpj { value: String, digits: usize },

    #[error("Invalid CPF: expected 11 digits, got {digits} in {value:?}")]
    InvalidCpf { value: String, digits: usize },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

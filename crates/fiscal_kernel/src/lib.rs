//! Fiscal Kernel - Foundational types for the NFS-e issuance core
//!
//! This crate provides the building blocks used across the issuance modules:
//! - Monetary types with precise decimal arithmetic
//! - The ABNT NBR 5891 rounding engine used for all currency values
//! - Brazilian tax identifiers (CNPJ, CPF)

pub mod error;
pub mod identifiers;
pub mod money;
pub mod rounding;

pub use error::{ComputationError, ValidationError};
pub use identifiers::{Cnpj, Cpf, Environment, TaxId};
pub use money::{MonetaryAmount, TaxRate};
pub use rounding::round_abnt;

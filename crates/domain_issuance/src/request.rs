//! Caller-facing input model
//!
//! These are request-scoped value objects: created by the caller,
//! consumed once by the orchestrator, never mutated mid-flight.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fiscal_kernel::{Cnpj, Environment, MonetaryAmount, TaxId, TaxRate};
use protocol_abrasf::CustomerAddress;

use crate::error::IssuanceError;

/// The immutable input to a single issuance attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub rps_number: u64,
    pub rps_series: String,
    pub competence_date: NaiveDate,
    /// Per-invoice override of the company's registered service-list
    /// item; `None` uses [`CompanyIdentity::service_list_item`]
    pub service_code: Option<String>,
    pub description: String,
    pub base_amount: MonetaryAmount,
    pub deductions: MonetaryAmount,
    pub iss_rate: TaxRate,
}

impl InvoiceRequest {
    /// Validates the request before any computation or network activity
    pub fn validate(&self) -> Result<(), IssuanceError> {
        if self.description.trim().is_empty() {
            return Err(IssuanceError::EmptyDescription);
        }
        if self.base_amount.is_negative() {
            return Err(fiscal_kernel::ComputationError::NegativeAmount("base_amount").into());
        }
        if self.deductions.is_negative() {
            return Err(fiscal_kernel::ComputationError::NegativeAmount("deductions").into());
        }
        Ok(())
    }
}

/// Read-only projection of the issuing company's fiscal registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub cnpj: Cnpj,
    pub municipal_registration: String,
    /// National service-list item the company issues under by default
    pub service_list_item: String,
    pub municipal_taxation_code: String,
    pub environment: Environment,
    /// Simples Nacional participant
    pub simples_nacional: bool,
    /// Fiscal-incentive beneficiary
    pub fiscal_incentive: bool,
}

/// Read-only projection of the service customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub tax_id: TaxId,
    pub legal_name: String,
    pub email: Option<String>,
    pub address: Option<CustomerAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            rps_number: 1,
            rps_series: "UNICA".into(),
            competence_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            service_code: None,
            description: "Serviço de consultoria".into(),
            base_amount: MonetaryAmount::new(dec!(100.00)),
            deductions: MonetaryAmount::zero(),
            iss_rate: TaxRate::new(dec!(0.05)).unwrap(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_blank_description_is_rejected() {
        let mut invalid = request();
        invalid.description = "  ".into();
        assert!(matches!(
            invalid.validate(),
            Err(IssuanceError::EmptyDescription)
        ));
    }

    #[test]
    fn test_negative_base_is_rejected() {
        let mut invalid = request();
        invalid.base_amount = MonetaryAmount::new(dec!(-1.00));
        assert!(matches!(
            invalid.validate(),
            Err(IssuanceError::Computation(_))
        ));
    }
}

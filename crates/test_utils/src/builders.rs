//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use domain_issuance::InvoiceRequest;
use fiscal_kernel::{MonetaryAmount, TaxRate};

use crate::fixtures::RequestFixtures;

/// Builder for invoice requests
pub struct InvoiceRequestBuilder {
    request: InvoiceRequest,
}

impl Default for InvoiceRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceRequestBuilder {
    /// Creates a builder seeded with the consulting fixture
    pub fn new() -> Self {
        Self {
            request: RequestFixtures::consulting(),
        }
    }

    /// Sets the RPS number
    pub fn with_rps_number(mut self, number: u64) -> Self {
        self.request.rps_number = number;
        self
    }

    /// Sets the RPS series
    pub fn with_rps_series(mut self, series: impl Into<String>) -> Self {
        self.request.rps_series = series.into();
        self
    }

    /// Sets the competence date
    pub fn with_competence_date(mut self, date: NaiveDate) -> Self {
        self.request.competence_date = date;
        self
    }

    /// Sets the per-invoice service code override
    pub fn with_service_code(mut self, code: impl Into<String>) -> Self {
        self.request.service_code = Some(code.into());
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.request.description = description.into();
        self
    }

    /// Sets the base amount
    pub fn with_base_amount(mut self, amount: Decimal) -> Self {
        self.request.base_amount = MonetaryAmount::new(amount);
        self
    }

    /// Sets the deductions
    pub fn with_deductions(mut self, amount: Decimal) -> Self {
        self.request.deductions = MonetaryAmount::new(amount);
        self
    }

    /// Sets the ISS rate
    pub fn with_iss_rate(mut self, rate: TaxRate) -> Self {
        self.request.iss_rate = rate;
        self
    }

    /// Builds the request
    pub fn build(self) -> InvoiceRequest {
        self.request
    }
}

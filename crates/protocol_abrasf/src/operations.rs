//! Typed ABRASF 2.04 operation requests
//!
//! One struct per operation the ISSNet DF service accepts. The query
//! operation is a sum type: a request selects exactly one of protocol,
//! NFS-e number, or emission period, and the variant carries the mode.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use fiscal_kernel::{Cnpj, MonetaryAmount, TaxId, TaxRate};

use crate::error::BuildError;

/// Namespace carried by the root element of every ABRASF document
pub const NFSE_XMLNS: &str = "http://www.abrasf.org.br/nfse.xsd";

/// IBGE municipality code for Brasília, the only municipality this
/// service issues for
pub const BRASILIA_IBGE_CODE: &str = "5300108";

/// Service-provider identification embedded in every operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub cnpj: Cnpj,
    pub municipal_registration: String,
}

/// RPS identification within a submit lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsIdentification {
    pub number: u64,
    pub series: String,
}

/// Service classification and free-text description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListing {
    /// National service-list item (e.g. "01.07")
    pub item_code: String,
    /// Municipal taxation code
    pub municipal_taxation_code: String,
    /// Free-text service description (Discriminacao)
    pub description: String,
}

/// The monetary block of a submit document.
///
/// All amounts must already carry their final ABNT rounding; the builder
/// renders them as-is with two fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceValues {
    pub service_amount: MonetaryAmount,
    pub deductions: MonetaryAmount,
    pub iss_value: MonetaryAmount,
    pub iss_rate: TaxRate,
    pub pis: MonetaryAmount,
    pub cofins: MonetaryAmount,
    pub inss: MonetaryAmount,
    pub ir: MonetaryAmount,
    pub csll: MonetaryAmount,
}

impl ServiceValues {
    /// Creates the values block with all federal withholdings at zero
    pub fn new(
        service_amount: MonetaryAmount,
        deductions: MonetaryAmount,
        iss_value: MonetaryAmount,
        iss_rate: TaxRate,
    ) -> Self {
        Self {
            service_amount,
            deductions,
            iss_value,
            iss_rate,
            pis: MonetaryAmount::zero(),
            cofins: MonetaryAmount::zero(),
            inss: MonetaryAmount::zero(),
            ir: MonetaryAmount::zero(),
            csll: MonetaryAmount::zero(),
        }
    }

    /// Supplies the federal withholdings explicitly
    pub fn with_federal_withholdings(
        mut self,
        pis: MonetaryAmount,
        cofins: MonetaryAmount,
        inss: MonetaryAmount,
        ir: MonetaryAmount,
        csll: MonetaryAmount,
    ) -> Self {
        self.pis = pis;
        self.cofins = cofins;
        self.inss = inss;
        self.ir = ir;
        self.csll = csll;
        self
    }
}

/// Customer address, optional on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    /// IBGE code of the customer's municipality
    pub municipality_code: String,
    pub state: String,
    pub postal_code: String,
}

/// Service customer (Tomador)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub tax_id: TaxId,
    pub legal_name: String,
    pub email: Option<String>,
    pub address: Option<CustomerAddress>,
}

/// A complete EnviarLoteRpsSincrono request: one RPS inside one lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub lot_number: u64,
    pub provider: Provider,
    pub rps: RpsIdentification,
    pub emission: NaiveDateTime,
    pub competence: NaiveDate,
    pub service: ServiceListing,
    pub values: ServiceValues,
    pub customer: Customer,
    /// Simples Nacional participant flag (OptanteSimplesNacional)
    pub simples_nacional: bool,
    /// Fiscal-incentive beneficiary flag (IncentivoFiscal)
    pub fiscal_incentive: bool,
}

/// A query, with the mode fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryRequest {
    /// Query a submitted lot by its protocol number
    ByProtocol(String),
    /// Query an issued invoice by NFS-e number
    ByNumber(String),
    /// Query issued invoices by emission period, bounds inclusive
    ByPeriod { start: NaiveDate, end: NaiveDate },
}

/// Loose query inputs as a caller sees them (one optional field per
/// mode). Conversion enforces that exactly one was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub protocol: Option<String>,
    pub nfse_number: Option<String>,
    pub period: Option<(NaiveDate, NaiveDate)>,
}

impl QueryParams {
    /// Converts into the typed query, rejecting zero or multiple modes
    pub fn into_request(self) -> Result<QueryRequest, BuildError> {
        let supplied = usize::from(self.protocol.is_some())
            + usize::from(self.nfse_number.is_some())
            + usize::from(self.period.is_some());
        match supplied {
            0 => Err(BuildError::EmptyQuery),
            1 => Ok(match (self.protocol, self.nfse_number, self.period) {
                (Some(protocol), _, _) => QueryRequest::ByProtocol(protocol),
                (_, Some(number), _) => QueryRequest::ByNumber(number),
                (_, _, Some((start, end))) => QueryRequest::ByPeriod { start, end },
                _ => unreachable!("exactly one mode was counted"),
            }),
            n => Err(BuildError::AmbiguousQuery(n)),
        }
    }
}

/// A CancelarNfse request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub provider: Provider,
    pub nfse_number: String,
    pub verification_code: String,
    /// Free-text justification transmitted alongside the fixed
    /// cancellation-reason code 1 ("error in issuance")
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_params_require_exactly_one_mode() {
        assert_eq!(
            QueryParams::default().into_request().unwrap_err(),
            BuildError::EmptyQuery
        );

        let both = QueryParams {
            protocol: Some("P1".into()),
            nfse_number: Some("42".into()),
            period: None,
        };
        assert_eq!(both.into_request().unwrap_err(), BuildError::AmbiguousQuery(2));

        let all = QueryParams {
            protocol: Some("P1".into()),
            nfse_number: Some("42".into()),
            period: Some((date(2024, 1, 1), date(2024, 1, 31))),
        };
        assert_eq!(all.into_request().unwrap_err(), BuildError::AmbiguousQuery(3));
    }

    #[test]
    fn test_query_params_single_mode_converts() {
        let by_protocol = QueryParams {
            protocol: Some("PROTO-9".into()),
            ..Default::default()
        };
        assert_eq!(
            by_protocol.into_request().unwrap(),
            QueryRequest::ByProtocol("PROTO-9".into())
        );

        let by_period = QueryParams {
            period: Some((date(2024, 5, 1), date(2024, 5, 31))),
            ..Default::default()
        };
        assert_eq!(
            by_period.into_request().unwrap(),
            QueryRequest::ByPeriod {
                start: date(2024, 5, 1),
                end: date(2024, 5, 31),
            }
        );
    }
}

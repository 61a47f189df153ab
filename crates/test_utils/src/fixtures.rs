//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the issuance core. Fixtures are
//! deterministic so unit tests stay predictable.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use domain_issuance::{CompanyIdentity, CustomerIdentity, InvoiceRequest};
use fiscal_kernel::{Cnpj, Environment, MonetaryAmount, TaxId, TaxRate};
use protocol_abrasf::CustomerAddress;

/// Fixture for company identities
pub struct CompanyFixtures;

impl CompanyFixtures {
    /// A homologation-environment company with standard codes
    pub fn homolog() -> CompanyIdentity {
        CompanyIdentity {
            cnpj: Cnpj::parse("12.345.678/0001-95").expect("fixture CNPJ"),
            municipal_registration: "0794568300186".to_string(),
            service_list_item: "01.07".to_string(),
            municipal_taxation_code: "10700".to_string(),
            environment: Environment::Homolog,
            simples_nacional: false,
            fiscal_incentive: false,
        }
    }

    /// The same company pointed at production
    pub fn production() -> CompanyIdentity {
        CompanyIdentity {
            environment: Environment::Production,
            ..Self::homolog()
        }
    }
}

/// Fixture for customer identities
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// An individual customer identified by CPF
    pub fn individual() -> CustomerIdentity {
        CustomerIdentity {
            tax_id: TaxId::parse("123.456.789-09").expect("fixture CPF"),
            legal_name: "Maria da Silva".to_string(),
            email: Some("maria@example.com".to_string()),
            address: None,
        }
    }

    /// A company customer identified by CNPJ, with a full address
    pub fn company() -> CustomerIdentity {
        CustomerIdentity {
            tax_id: TaxId::parse("98.765.432/0001-10").expect("fixture CNPJ"),
            legal_name: "Comércio e Serviços Ltda".to_string(),
            email: None,
            address: Some(CustomerAddress {
                street: "SCS Quadra 2".to_string(),
                number: "100".to_string(),
                complement: Some("Sala 301".to_string()),
                district: "Asa Sul".to_string(),
                municipality_code: "5300108".to_string(),
                state: "DF".to_string(),
                postal_code: "70302000".to_string(),
            }),
        }
    }
}

/// Fixture for invoice requests
pub struct RequestFixtures;

impl RequestFixtures {
    /// A small consulting invoice at the 5% municipal ceiling
    pub fn consulting() -> InvoiceRequest {
        InvoiceRequest {
            rps_number: 42,
            rps_series: "UNICA".to_string(),
            competence_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("fixture date"),
            service_code: None,
            description: "Consultoria em sistemas de informação".to_string(),
            base_amount: MonetaryAmount::new(dec!(86.06)),
            deductions: MonetaryAmount::zero(),
            iss_rate: TaxRate::new(dec!(0.05)).expect("fixture rate"),
        }
    }
}

/// Canned authority response documents
pub struct ResponseFixtures;

impl ResponseFixtures {
    /// A synchronous submit acceptance carrying protocol, number, and
    /// verification code
    pub fn submit_accepted() -> &'static str {
        r#"<EnviarLoteRpsSincronoResposta xmlns="http://www.abrasf.org.br/nfse.xsd">
  <Protocolo>PROT-123</Protocolo>
  <ListaNfse><CompNfse><Nfse versao="2.04"><InfNfse Id="n55">
    <Numero>55</Numero>
    <CodigoVerificacao>AB12-CD34</CodigoVerificacao>
  </InfNfse></Nfse></CompNfse></ListaNfse>
</EnviarLoteRpsSincronoResposta>"#
    }

    /// A rejection with one MensagemRetorno entry
    pub fn submit_rejected() -> &'static str {
        r#"<EnviarLoteRpsSincronoResposta xmlns="http://www.abrasf.org.br/nfse.xsd">
  <ListaMensagemRetorno><MensagemRetorno>
    <Codigo>E4</Codigo><Mensagem>RPS ja informado</Mensagem>
  </MensagemRetorno></ListaMensagemRetorno>
</EnviarLoteRpsSincronoResposta>"#
    }

    /// A cancellation confirmation
    pub fn cancel_confirmed() -> &'static str {
        r#"<CancelarNfseResposta xmlns="http://www.abrasf.org.br/nfse.xsd">
  <RetCancelamento><NfseCancelamento><Confirmacao>
    <Numero>55</Numero>
  </Confirmacao></NfseCancelamento></RetCancelamento>
</CancelarNfseResposta>"#
    }
}

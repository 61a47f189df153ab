//! Cross-module tests for the ABRASF protocol layer

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use fiscal_kernel::{Cnpj, MonetaryAmount, TaxId, TaxRate};
use protocol_abrasf::{
    build_submit, find_first_text, mask_sensitive, wrap, Customer, Provider, QueryParams,
    RpsIdentification, ServiceListing, ServiceValues, SoapOperation, SubmitRequest,
};

fn sample_submit() -> SubmitRequest {
    SubmitRequest {
        lot_number: 1715099999999,
        provider: Provider {
            cnpj: Cnpj::parse("12.345.678/0001-95").unwrap(),
            municipal_registration: "0794568300186".into(),
        },
        rps: RpsIdentification {
            number: 7,
            series: "UNICA".into(),
        },
        emission: NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap(),
        competence: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        service: ServiceListing {
            item_code: "01.07".into(),
            municipal_taxation_code: "10700".into(),
            description: "Consultoria em sistemas < migração & suporte >".into(),
        },
        values: ServiceValues::new(
            MonetaryAmount::new(dec!(309.75)),
            MonetaryAmount::zero(),
            MonetaryAmount::new(dec!(15.49)),
            TaxRate::new(dec!(0.05)).unwrap(),
        ),
        customer: Customer {
            tax_id: TaxId::parse("98.765.432/0001-10").unwrap(),
            legal_name: "Comércio & Serviços Ltda".into(),
            email: None,
            address: None,
        },
        simples_nacional: true,
        fiscal_incentive: false,
    }
}

/// Build-then-extract round trip: the structural lookups recover the
/// rounded values and the verbatim description.
#[test]
fn test_submit_round_trip_through_structural_lookup() {
    let xml = build_submit(&sample_submit()).unwrap();

    assert_eq!(
        find_first_text(&xml, "ValorServicos").unwrap().as_deref(),
        Some("309.75")
    );
    assert_eq!(
        find_first_text(&xml, "ValorIss").unwrap().as_deref(),
        Some("15.49")
    );
    assert_eq!(
        find_first_text(&xml, "Aliquota").unwrap().as_deref(),
        Some("5.0000")
    );
    assert_eq!(
        find_first_text(&xml, "Discriminacao").unwrap().as_deref(),
        Some("Consultoria em sistemas < migração & suporte >")
    );
    assert_eq!(
        find_first_text(&xml, "RazaoSocial").unwrap().as_deref(),
        Some("Comércio & Serviços Ltda")
    );
}

#[test]
fn test_enveloped_submit_survives_cdata() {
    let document = build_submit(&sample_submit()).unwrap();
    let envelope = wrap(SoapOperation::SubmitLotSync, &document);

    assert!(envelope.contains("<![CDATA["));
    assert!(envelope.contains("<EnviarLoteRpsSincrono xmlns="));
    // The inner document is carried intact.
    assert!(envelope.contains("<NumeroLote>1715099999999</NumeroLote>"));
}

#[test]
fn test_masked_submit_hides_identifiers_only() {
    let xml = build_submit(&sample_submit()).unwrap();
    let masked = mask_sensitive(&xml);

    assert!(!masked.contains("12345678000195"));
    assert!(!masked.contains("98765432000110"));
    assert!(!masked.contains("0794568300186"));
    assert!(masked.contains("<Cnpj>***</Cnpj>"));
    assert!(masked.contains("<InscricaoMunicipal>***</InscricaoMunicipal>"));
    // Monetary values stay readable for audit.
    assert!(masked.contains("<ValorServicos>309.75</ValorServicos>"));
}

#[test]
fn test_query_params_flow_into_documents() {
    let provider = sample_submit().provider;

    let request = QueryParams {
        nfse_number: Some("55".into()),
        ..Default::default()
    }
    .into_request()
    .unwrap();

    let xml = protocol_abrasf::build_query(&provider, &request).unwrap();
    assert!(xml.contains("<NumeroNfse>55</NumeroNfse>"));
    assert!(xml.contains("<Pagina>1</Pagina>"));
}

//! SoapClient tests against a wiremock server

use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_issuance::{ResultProvenance, SoapTransport, TransportError};
use fiscal_kernel::Environment;
use infra_transport::{SoapClient, TransportConfig};
use protocol_abrasf::SoapOperation;

fn config_for(server: &MockServer) -> TransportConfig {
    TransportConfig {
        environment: Environment::Homolog,
        homolog_url: format!("{}/webservicenfse204/nfse.asmx", server.uri()),
        production_url: "https://unused.example".into(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_successful_call_returns_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webservicenfse204/nfse.asmx"))
        .and(header("Content-Type", "application/soap+xml; charset=utf-8"))
        .and(header(
            "SOAPAction",
            "http://www.issnetonline.com.br/webservice/nfse/EnviarLoteRpsSincrono",
        ))
        .and(body_string_contains("EnviarLoteRpsSincronoEnvio"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<Resposta><Numero>55</Numero></Resposta>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SoapClient::new(config_for(&server)).unwrap();
    let body = client
        .call(
            SoapOperation::SubmitLotSync,
            "<env><EnviarLoteRpsSincronoEnvio/></env>",
        )
        .await
        .unwrap();

    assert_eq!(body, "<Resposta><Numero>55</Numero></Resposta>");
    assert_eq!(client.provenance(), ResultProvenance::Authority);
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let client = SoapClient::new(config_for(&server)).unwrap();
    let outcome = client.call(SoapOperation::QueryLot, "<env/>").await;

    match outcome {
        Err(TransportError::Http { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("internal failure"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = SoapClient::new(config_for(&server)).unwrap();
    let outcome = client.call(SoapOperation::Cancel, "<env/>").await;

    assert!(matches!(
        outcome,
        Err(TransportError::Http { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_timeout_surfaces_as_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.timeout_secs = 1;

    let client = SoapClient::new(config).unwrap();
    let outcome = client.call(SoapOperation::QueryIssued, "<env/>").await;

    assert!(matches!(outcome, Err(TransportError::Timeout(1))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_connect_error() {
    // Nothing listens on this port.
    let config = TransportConfig {
        environment: Environment::Homolog,
        homolog_url: "http://127.0.0.1:9/nfse.asmx".into(),
        production_url: "https://unused.example".into(),
        timeout_secs: 2,
    };

    let client = SoapClient::new(config).unwrap();
    let outcome = client.call(SoapOperation::QueryLot, "<env/>").await;

    assert!(matches!(outcome, Err(TransportError::Connect(_))));
}

//! The reqwest-backed SOAP client

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use domain_issuance::{SoapTransport, TransportError};
use protocol_abrasf::{mask_sensitive, SoapOperation};

use crate::config::TransportConfig;

const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// Longest response excerpt carried inside a transport error
const ERROR_BODY_EXCERPT: usize = 512;

/// An already-decrypted client credential for mutual TLS.
///
/// The external certificate store decrypts the company's PFX and hands
/// over the PEM pair; this type only concatenates it for reqwest.
#[derive(Clone)]
pub struct ClientCertificate {
    pem: Vec<u8>,
}

impl ClientCertificate {
    /// Builds a credential from a PEM certificate and PEM private key
    pub fn from_pem(certificate_pem: &[u8], private_key_pem: &[u8]) -> Self {
        let mut pem = Vec::with_capacity(certificate_pem.len() + private_key_pem.len() + 1);
        pem.extend_from_slice(certificate_pem);
        pem.push(b'\n');
        pem.extend_from_slice(private_key_pem);
        Self { pem }
    }

    fn identity(&self) -> Result<reqwest::Identity, TransportError> {
        reqwest::Identity::from_pem(&self.pem)
            .map_err(|e| TransportError::InvalidCertificate(e.to_string()))
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material never reaches Debug output.
        f.debug_struct("ClientCertificate").finish_non_exhaustive()
    }
}

/// HTTPS SOAP 1.2 client for the authority endpoint.
///
/// Query operations work without client auth; issuance and cancellation
/// require the company certificate, which the caller supplies via
/// [`SoapClient::with_certificate`]. The client itself does not enforce
/// that business rule.
#[derive(Debug)]
pub struct SoapClient {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl SoapClient {
    /// Creates a client without mutual TLS
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        Self::build(config, None)
    }

    /// Creates a client that presents the given certificate during the
    /// TLS handshake
    pub fn with_certificate(
        config: TransportConfig,
        certificate: &ClientCertificate,
    ) -> Result<Self, TransportError> {
        let identity = certificate.identity()?;
        Self::build(config, Some(identity))
    }

    fn build(
        config: TransportConfig,
        identity: Option<reqwest::Identity>,
    ) -> Result<Self, TransportError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(identity) = identity {
            builder = builder.identity(identity);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// The endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_EXCERPT).collect()
}

#[async_trait]
impl SoapTransport for SoapClient {
    async fn call(
        &self,
        operation: SoapOperation,
        envelope: &str,
    ) -> Result<String, TransportError> {
        debug!(
            operation = %operation,
            endpoint = %self.endpoint,
            payload = %mask_sensitive(envelope),
            "posting SOAP request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", operation.soap_action())
            .body(envelope.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout_secs)
                } else {
                    TransportError::Connect(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        debug!(
            operation = %operation,
            status = status.as_u16(),
            payload = %mask_sensitive(&body),
            "authority responded"
        );
        Ok(body)
    }
}

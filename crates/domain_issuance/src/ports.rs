//! Boundary ports implemented by infrastructure adapters
//!
//! The orchestrator receives its collaborators through these traits,
//! never through ambient globals. `infra_transport` provides the
//! production [`SoapTransport`]; the signing credential comes from the
//! external certificate store behind [`RpsSigner`].

use async_trait::async_trait;

use protocol_abrasf::SoapOperation;

use crate::error::{SigningError, TransportError};
use crate::result::ResultProvenance;

/// A single-attempt SOAP 1.2 call to the authority endpoint.
///
/// Implementations perform no retries; retry policy belongs to the
/// caller, with a fresh RPS number.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    /// Posts the envelope and returns the raw response body
    async fn call(&self, operation: SoapOperation, envelope: &str)
        -> Result<String, TransportError>;

    /// Provenance stamped onto results derived from this transport.
    /// Test doubles override this; production transports do not.
    fn provenance(&self) -> ResultProvenance {
        ResultProvenance::Authority
    }
}

/// Applies the company's signing credential to an ABRASF document.
///
/// The core never decrypts or stores certificates; the implementation
/// wraps an already-decrypted key pair.
pub trait RpsSigner: Send + Sync {
    fn sign(&self, document: &str) -> Result<String, SigningError>;
}

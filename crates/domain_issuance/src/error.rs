//! Issuance domain errors

use thiserror::Error;

use fiscal_kernel::{ComputationError, ValidationError};
use protocol_abrasf::{BuildError, ParseError};

/// HTTP/TLS failure reaching the authority endpoint.
///
/// The transport performs a single attempt; whether to retry with a new
/// RPS number is the caller's decision.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Authority returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Connection to authority failed: {0}")]
    Connect(String),

    #[error("Client certificate rejected: {0}")]
    InvalidCertificate(String),

    #[error("Failed to construct HTTP client: {0}")]
    ClientBuild(String),
}

/// Failure while applying the external signing credential to a document
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Document signing failed: {0}")]
    Failed(String),
}

/// Top-level error of an issuance, query, or cancellation attempt
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Document build error: {0}")]
    Build(#[from] BuildError),

    #[error("Response parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Cancellation reason has {length} characters, minimum is {minimum}")]
    CancellationReasonTooShort { length: usize, minimum: usize },

    #[error("Record is missing {0}, required for cancellation")]
    MissingCancellationData(&'static str),

    #[error("Invoice description must not be empty")]
    EmptyDescription,
}

//! Protocol-layer errors

use thiserror::Error;

/// Errors raised while constructing an operation document, before any
/// network activity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Query must select exactly one mode, none supplied")]
    EmptyQuery,

    #[error("Query must select exactly one mode, {0} supplied")]
    AmbiguousQuery(usize),

    #[error("Query period start {start} is after end {end}")]
    InvalidPeriod { start: String, end: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors raised while reading an authority response.
///
/// Authority-signaled failures (MensagemRetorno entries, SOAP faults) are
/// not parse errors; they come back inside [`crate::AuthorityResponse`]
/// with the offending messages verbatim.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed response XML: {0}")]
    Malformed(#[from] quick_xml::Error),
}

//! ABRASF 2.04 protocol layer for the ISSNet DF web service
//!
//! This crate owns everything that touches the wire format:
//! - Typed operation requests ([`SubmitRequest`], [`QueryRequest`],
//!   [`CancelRequest`]) with the "exactly one query mode" invariant
//!   enforced by the type system
//! - XML document construction for each operation
//! - The SOAP 1.2 envelope with the CDATA payload convention
//! - Structural parsing of authority responses
//! - Masking of sensitive tag contents before payloads are logged

pub mod builder;
pub mod envelope;
pub mod error;
pub mod masking;
pub mod operations;
pub mod parser;

pub use builder::{build_cancel, build_query, build_submit};
pub use envelope::{wrap, SoapOperation};
pub use error::{BuildError, ParseError};
pub use masking::mask_sensitive;
pub use operations::{
    CancelRequest, Customer, CustomerAddress, Provider, QueryParams, QueryRequest,
    RpsIdentification, ServiceListing, ServiceValues, SubmitRequest, BRASILIA_IBGE_CODE,
    NFSE_XMLNS,
};
pub use parser::{find_first_text, parse, AuthorityResponse, NfseRecord};

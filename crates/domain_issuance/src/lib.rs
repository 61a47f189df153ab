//! Issuance domain for the NFS-e core
//!
//! Ties the fiscal kernel and the ABRASF protocol layer together:
//! callers hand in an [`InvoiceRequest`] plus company and customer
//! identities, the [`IssuanceService`] computes the tax breakdown,
//! builds and transmits the documents, and drives the invoice lifecycle
//! (`Pending -> Issued | Failed`, `Issued -> Canceled`).

pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod request;
pub mod result;
pub mod service;
pub mod tax;

pub use error::{IssuanceError, SigningError, TransportError};
pub use lifecycle::{InvoiceStatus, IssuanceRecord};
pub use ports::{RpsSigner, SoapTransport};
pub use request::{CompanyIdentity, CustomerIdentity, InvoiceRequest};
pub use result::{IssuanceResult, ResultProvenance};
pub use service::IssuanceService;
pub use tax::{calculate_iss, calculate_net_value, calculate_tax_values, TaxBreakdown};

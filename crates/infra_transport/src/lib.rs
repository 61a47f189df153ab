//! Transport adapter for the ISSNet DF web service
//!
//! Implements the domain's `SoapTransport` port over reqwest: HTTPS
//! POST with the SOAP 1.2 content type and a SOAPAction header, the
//! endpoint selected by environment, mutual TLS when a client
//! certificate is configured. One attempt per call; no retries.

pub mod client;
pub mod config;

pub use client::{ClientCertificate, SoapClient};
pub use config::{TransportConfig, DEFAULT_HOMOLOG_URL, DEFAULT_PRODUCTION_URL};

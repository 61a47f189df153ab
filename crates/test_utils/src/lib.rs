//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the NFS-e issuance test
//! suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data and canned authority responses
//! - `builders`: Builder patterns for test data construction
//! - `generators`: Property-based test data generators
//! - `transports`: Explicitly-labeled transport doubles

pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod transports;

pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use transports::*;

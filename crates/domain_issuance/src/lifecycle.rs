//! Invoice lifecycle state machine
//!
//! `Pending -> {Issued | Failed}`, `Issued -> Canceled`. Failed and
//! Canceled are terminal; retrying a failed issuance means creating a
//! new Pending record with a fresh RPS number, never resurrecting the
//! old one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IssuanceError;

/// Lifecycle status of one issuance attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Created, not yet transmitted or awaiting the authority's verdict
    Pending,
    /// The authority converted the RPS into an NFS-e
    Issued,
    /// Transport failure or authority rejection
    Failed,
    /// Issued, then canceled at the authority
    Canceled,
}

impl InvoiceStatus {
    /// True for states with no outgoing transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Canceled)
    }

    fn can_transition_to(&self, target: InvoiceStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Issued)
                | (Self::Pending, Self::Failed)
                | (Self::Issued, Self::Canceled)
        )
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Issued => "Issued",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
        };
        write!(f, "{name}")
    }
}

/// The mutable record of one issuance attempt.
///
/// Tracks the status plus the artifacts the authority hands back. All
/// transitions are guarded; an invalid one leaves the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub rps_number: u64,
    pub rps_series: String,
    pub status: InvoiceStatus,
    pub protocol: Option<String>,
    pub nfse_number: Option<String>,
    pub verification_code: Option<String>,
    /// Authority or transport failure messages, verbatim
    pub failure_messages: Vec<String>,
}

impl IssuanceRecord {
    /// Creates a Pending record for an RPS
    pub fn new(rps_number: u64, rps_series: impl Into<String>) -> Self {
        Self {
            rps_number,
            rps_series: rps_series.into(),
            status: InvoiceStatus::Pending,
            protocol: None,
            nfse_number: None,
            verification_code: None,
            failure_messages: Vec::new(),
        }
    }

    fn transition(&mut self, target: InvoiceStatus) -> Result<(), IssuanceError> {
        if !self.status.can_transition_to(target) {
            return Err(IssuanceError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        Ok(())
    }

    /// Pending -> Issued, recording the authority's artifacts
    pub fn mark_issued(
        &mut self,
        protocol: Option<String>,
        nfse_number: String,
        verification_code: Option<String>,
    ) -> Result<(), IssuanceError> {
        self.transition(InvoiceStatus::Issued)?;
        self.protocol = protocol;
        self.nfse_number = Some(nfse_number);
        self.verification_code = verification_code;
        Ok(())
    }

    /// Pending -> Failed, keeping the failure messages for the caller
    pub fn mark_failed(&mut self, messages: Vec<String>) -> Result<(), IssuanceError> {
        self.transition(InvoiceStatus::Failed)?;
        self.failure_messages = messages;
        Ok(())
    }

    /// Issued -> Canceled
    pub fn mark_canceled(&mut self) -> Result<(), IssuanceError> {
        self.transition(InvoiceStatus::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_issued() {
        let mut record = IssuanceRecord::new(1, "UNICA");
        record
            .mark_issued(Some("P-1".into()), "55".into(), Some("AB-12".into()))
            .unwrap();
        assert_eq!(record.status, InvoiceStatus::Issued);
        assert_eq!(record.nfse_number.as_deref(), Some("55"));
    }

    #[test]
    fn test_pending_to_failed_keeps_messages() {
        let mut record = IssuanceRecord::new(1, "UNICA");
        record.mark_failed(vec!["E4: RPS ja informado".into()]).unwrap();
        assert_eq!(record.status, InvoiceStatus::Failed);
        assert_eq!(record.failure_messages.len(), 1);
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut record = IssuanceRecord::new(1, "UNICA");
        record.mark_failed(vec![]).unwrap();
        assert!(record.status.is_terminal());
        assert!(matches!(
            record.mark_issued(None, "55".into(), None),
            Err(IssuanceError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_requires_issued() {
        let mut record = IssuanceRecord::new(1, "UNICA");
        assert!(record.mark_canceled().is_err());

        record.mark_issued(None, "55".into(), None).unwrap();
        record.mark_canceled().unwrap();
        assert_eq!(record.status, InvoiceStatus::Canceled);

        // No un-cancel.
        assert!(record.mark_canceled().is_err());
        assert!(record.mark_failed(vec![]).is_err());
    }
}

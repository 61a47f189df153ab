//! Transport doubles
//!
//! [`SimulatedAuthority`] stands in for the ISSNet endpoint when tests
//! need end-to-end orchestration without a network. Results derived
//! from it are stamped [`ResultProvenance::Simulated`], so simulated
//! data can never masquerade as an authority reply downstream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use domain_issuance::{ResultProvenance, SoapTransport, TransportError};
use protocol_abrasf::SoapOperation;

use crate::fixtures::ResponseFixtures;

/// What the simulated authority replies with
#[derive(Debug, Clone)]
pub enum SimulatedBehavior {
    /// Accept every submit and cancel
    Accept,
    /// Reject with the canned MensagemRetorno response
    Reject,
    /// Fail at the transport level
    Unreachable,
}

/// A scripted stand-in for the authority endpoint
pub struct SimulatedAuthority {
    behavior: SimulatedBehavior,
    calls: AtomicUsize,
    last_envelope: Mutex<Option<String>>,
}

impl SimulatedAuthority {
    /// Creates a double with the given behavior
    pub fn new(behavior: SimulatedBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_envelope: Mutex::new(None),
        }
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent envelope posted to the double
    pub fn last_envelope(&self) -> Option<String> {
        self.last_envelope.lock().expect("envelope lock").clone()
    }
}

#[async_trait]
impl SoapTransport for SimulatedAuthority {
    async fn call(
        &self,
        operation: SoapOperation,
        envelope: &str,
    ) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_envelope.lock().expect("envelope lock") = Some(envelope.to_string());

        match self.behavior {
            SimulatedBehavior::Accept => Ok(match operation {
                SoapOperation::Cancel => ResponseFixtures::cancel_confirmed().to_string(),
                _ => ResponseFixtures::submit_accepted().to_string(),
            }),
            SimulatedBehavior::Reject => Ok(ResponseFixtures::submit_rejected().to_string()),
            SimulatedBehavior::Unreachable => {
                Err(TransportError::Connect("simulated outage".to_string()))
            }
        }
    }

    fn provenance(&self) -> ResultProvenance {
        ResultProvenance::Simulated
    }
}

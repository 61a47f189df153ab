//! Issuance orchestration
//!
//! The control flow of one attempt: validate, compute the tax
//! breakdown, build the document, sign (when a credential is present),
//! wrap, transmit, parse, classify, and drive the record's state
//! machine. The service holds no state of its own and may be shared
//! freely across concurrent calls.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use tracing::{debug, info, warn};

use protocol_abrasf::{
    build_cancel, build_query, build_submit, mask_sensitive, parse, wrap, AuthorityResponse,
    CancelRequest, Customer, Provider, QueryRequest, RpsIdentification, ServiceListing,
    ServiceValues, SoapOperation, SubmitRequest,
};

use crate::error::IssuanceError;
use crate::lifecycle::{InvoiceStatus, IssuanceRecord};
use crate::ports::{RpsSigner, SoapTransport};
use crate::request::{CompanyIdentity, CustomerIdentity, InvoiceRequest};
use crate::result::IssuanceResult;
use crate::tax::calculate_tax_values;

/// Minimum length of a cancellation reason, enforced before any network
/// call is made
pub const MIN_CANCEL_REASON_CHARS: usize = 10;

/// Orchestrates submit, query, and cancel against the authority.
///
/// Collaborators arrive by injection; there is no global client state.
pub struct IssuanceService {
    transport: Arc<dyn SoapTransport>,
    signer: Option<Arc<dyn RpsSigner>>,
}

impl IssuanceService {
    /// Creates a service over a transport, without a signing credential
    pub fn new(transport: Arc<dyn SoapTransport>) -> Self {
        Self {
            transport,
            signer: None,
        }
    }

    /// Attaches the company's signing credential
    pub fn with_signer(mut self, signer: Arc<dyn RpsSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Submits one RPS for synchronous conversion into an NFS-e.
    ///
    /// Drives the record: authority acceptance moves it to Issued,
    /// rejection or a garbled response to Failed. Transport failures
    /// also move it to Failed and surface as an error so the caller can
    /// decide on a retry with a fresh RPS number.
    pub async fn issue(
        &self,
        record: &mut IssuanceRecord,
        request: &InvoiceRequest,
        company: &CompanyIdentity,
        customer: &CustomerIdentity,
    ) -> Result<IssuanceResult, IssuanceError> {
        if record.status != InvoiceStatus::Pending {
            return Err(IssuanceError::InvalidStatusTransition {
                from: record.status.to_string(),
                to: InvoiceStatus::Issued.to_string(),
            });
        }
        request.validate()?;

        let breakdown =
            calculate_tax_values(request.base_amount, request.iss_rate, request.deductions)?;

        let submit = SubmitRequest {
            lot_number: next_lot_number(),
            provider: provider_of(company),
            rps: RpsIdentification {
                number: request.rps_number,
                series: request.rps_series.clone(),
            },
            emission: Utc::now().naive_utc(),
            competence: request.competence_date,
            service: ServiceListing {
                item_code: request
                    .service_code
                    .clone()
                    .unwrap_or_else(|| company.service_list_item.clone()),
                municipal_taxation_code: company.municipal_taxation_code.clone(),
                description: request.description.clone(),
            },
            values: ServiceValues::new(
                breakdown.base_value,
                breakdown.deductions,
                breakdown.iss_value,
                breakdown.iss_rate,
            ),
            customer: Customer {
                tax_id: customer.tax_id.clone(),
                legal_name: customer.legal_name.clone(),
                email: customer.email.clone(),
                address: customer.address.clone(),
            },
            simples_nacional: company.simples_nacional,
            fiscal_incentive: company.fiscal_incentive,
        };

        let mut document = build_submit(&submit)?;
        if let Some(signer) = &self.signer {
            document = signer.sign(&document)?;
        }
        let envelope = wrap(SoapOperation::SubmitLotSync, &document);

        info!(
            rps_number = request.rps_number,
            lot_number = submit.lot_number,
            environment = %company.environment,
            "submitting RPS lot"
        );

        let raw = match self.transport.call(SoapOperation::SubmitLotSync, &envelope).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(rps_number = request.rps_number, error = %err, "transport failure during issuance");
                record.mark_failed(vec![err.to_string()])?;
                return Err(err.into());
            }
        };

        let response = match parse(&raw) {
            Ok(response) => response,
            Err(err) => {
                record.mark_failed(vec![err.to_string()])?;
                return Err(err.into());
            }
        };

        let result = IssuanceResult::from_response(response, self.transport.provenance());
        match &result.nfse_number {
            Some(number) if result.success => {
                record.mark_issued(
                    result.protocol.clone(),
                    number.clone(),
                    result.verification_code.clone(),
                )?;
                info!(rps_number = request.rps_number, nfse_number = %number, "NFS-e issued");
            }
            _ => {
                let mut messages = result.errors.clone();
                if messages.is_empty() {
                    messages.push("authority reply carried no invoice number".to_string());
                }
                warn!(
                    rps_number = request.rps_number,
                    errors = messages.len(),
                    "authority rejected the RPS"
                );
                record.mark_failed(messages)?;
            }
        }

        Ok(result)
    }

    /// Runs a query; no record state is involved
    pub async fn query(
        &self,
        company: &CompanyIdentity,
        query: QueryRequest,
    ) -> Result<AuthorityResponse, IssuanceError> {
        let operation = match &query {
            QueryRequest::ByProtocol(_) => SoapOperation::QueryLot,
            QueryRequest::ByNumber(_) | QueryRequest::ByPeriod { .. } => {
                SoapOperation::QueryIssued
            }
        };
        let document = build_query(&provider_of(company), &query)?;
        let envelope = wrap(operation, &document);

        debug!(operation = %operation, "querying authority");
        let raw = self.transport.call(operation, &envelope).await?;
        Ok(parse(&raw)?)
    }

    /// Cancels an issued invoice.
    ///
    /// Rejected before any network call unless the record is Issued and
    /// the reason has at least [`MIN_CANCEL_REASON_CHARS`] characters.
    pub async fn cancel(
        &self,
        record: &mut IssuanceRecord,
        company: &CompanyIdentity,
        reason: &str,
    ) -> Result<IssuanceResult, IssuanceError> {
        let reason = reason.trim();
        if reason.chars().count() < MIN_CANCEL_REASON_CHARS {
            return Err(IssuanceError::CancellationReasonTooShort {
                length: reason.chars().count(),
                minimum: MIN_CANCEL_REASON_CHARS,
            });
        }
        if record.status != InvoiceStatus::Issued {
            return Err(IssuanceError::InvalidStatusTransition {
                from: record.status.to_string(),
                to: InvoiceStatus::Canceled.to_string(),
            });
        }
        let nfse_number = record
            .nfse_number
            .clone()
            .ok_or(IssuanceError::MissingCancellationData("nfse_number"))?;
        let verification_code = record
            .verification_code
            .clone()
            .ok_or(IssuanceError::MissingCancellationData("verification_code"))?;

        let cancel = CancelRequest {
            provider: provider_of(company),
            nfse_number: nfse_number.clone(),
            verification_code,
            reason: reason.to_string(),
        };
        let document = build_cancel(&cancel)?;
        let envelope = wrap(SoapOperation::Cancel, &document);

        info!(nfse_number = %nfse_number, "requesting cancellation");
        debug!(payload = %mask_sensitive(&envelope), "cancellation envelope");

        let raw = self.transport.call(SoapOperation::Cancel, &envelope).await?;
        let response = parse(&raw)?;
        let result = IssuanceResult::from_response(response, self.transport.provenance());

        if result.success {
            record.mark_canceled()?;
            info!(nfse_number = %nfse_number, "NFS-e canceled");
        } else {
            warn!(
                nfse_number = %nfse_number,
                errors = result.errors.len(),
                "authority refused cancellation"
            );
        }

        Ok(result)
    }
}

fn provider_of(company: &CompanyIdentity) -> Provider {
    Provider {
        cnpj: company.cnpj.clone(),
        municipal_registration: company.municipal_registration.clone(),
    }
}

/// Monotonically distinct lot number from the wall clock.
///
/// The authority only requires distinctness per issuer; nanosecond
/// resolution keeps concurrent submissions apart.
fn next_lot_number() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

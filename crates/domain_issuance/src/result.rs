//! Terminal artifact of one authority call

use serde::{Deserialize, Serialize};

use protocol_abrasf::AuthorityResponse;

/// Where a result came from.
///
/// Simulated results only ever originate from explicitly-labeled test
/// doubles; production transports always report `Authority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultProvenance {
    Authority,
    Simulated,
}

/// Outcome of a submit or cancel call, as the caller persists it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceResult {
    pub success: bool,
    pub protocol: Option<String>,
    pub nfse_number: Option<String>,
    pub verification_code: Option<String>,
    /// Authority-supplied failure strings, verbatim, fault included
    pub errors: Vec<String>,
    /// The cleaned response document, retained for audit
    pub raw_response_xml: String,
    pub provenance: ResultProvenance,
}

impl IssuanceResult {
    /// Builds a result from a parsed authority response
    pub fn from_response(response: AuthorityResponse, provenance: ResultProvenance) -> Self {
        let success = response.success();
        let errors = response.error_messages();
        let (nfse_number, verification_code) = response
            .first_record()
            .map(|record| (record.number.clone(), record.verification_code.clone()))
            .unwrap_or((None, None));

        Self {
            success,
            protocol: response.protocol,
            nfse_number,
            verification_code,
            errors,
            raw_response_xml: response.raw_xml,
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol_abrasf::NfseRecord;

    #[test]
    fn test_from_successful_response() {
        let response = AuthorityResponse {
            protocol: Some("P-9".into()),
            records: vec![NfseRecord {
                number: Some("55".into()),
                verification_code: Some("AB-12".into()),
            }],
            errors: vec![],
            fault: None,
            raw_xml: "<xml/>".into(),
        };
        let result = IssuanceResult::from_response(response, ResultProvenance::Authority);
        assert!(result.success);
        assert_eq!(result.nfse_number.as_deref(), Some("55"));
        assert_eq!(result.verification_code.as_deref(), Some("AB-12"));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_result_serializes_for_persistence() {
        let response = AuthorityResponse {
            protocol: Some("P-9".into()),
            records: vec![],
            errors: vec![],
            fault: None,
            raw_xml: String::new(),
        };
        let result = IssuanceResult::from_response(response, ResultProvenance::Simulated);
        let json = serde_json::to_string(&result).unwrap();
        let back: IssuanceResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(json.contains("Simulated"));
    }

    #[test]
    fn test_from_rejected_response() {
        let response = AuthorityResponse {
            protocol: None,
            records: vec![],
            errors: vec!["E4: RPS ja informado".into()],
            fault: None,
            raw_xml: "<xml/>".into(),
        };
        let result = IssuanceResult::from_response(response, ResultProvenance::Authority);
        assert!(!result.success);
        assert_eq!(result.errors, vec!["E4: RPS ja informado"]);
        assert_eq!(result.raw_response_xml, "<xml/>");
    }
}

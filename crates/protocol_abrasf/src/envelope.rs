//! SOAP 1.2 envelope for the ISSNet DF service
//!
//! Every ABRASF document travels inside the operation element as a CDATA
//! payload. The service resolves the operation from the body element and
//! from the SOAPAction header.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace of the ISSNet web-service operations
pub const SERVICE_XMLNS: &str = "http://www.issnetonline.com.br/webservice/nfse";

/// The operations exposed by the authority endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoapOperation {
    /// Synchronous lot submission (EnviarLoteRpsSincrono)
    SubmitLotSync,
    /// Lot query by protocol (ConsultarLoteRps)
    QueryLot,
    /// Issued-invoice query by number or period (ConsultarNfseServicoPrestado)
    QueryIssued,
    /// Invoice cancellation (CancelarNfse)
    Cancel,
}

impl SoapOperation {
    /// The wire name of the operation element
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitLotSync => "EnviarLoteRpsSincrono",
            Self::QueryLot => "ConsultarLoteRps",
            Self::QueryIssued => "ConsultarNfseServicoPrestado",
            Self::Cancel => "CancelarNfse",
        }
    }

    /// Value of the SOAPAction header for this operation
    pub fn soap_action(&self) -> String {
        format!("{SERVICE_XMLNS}/{}", self.name())
    }
}

impl fmt::Display for SoapOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Wraps an ABRASF document in the SOAP 1.2 envelope.
///
/// The document rides as CDATA, so its own markup never needs entity
/// escaping on the way out.
pub fn wrap(operation: SoapOperation, document: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<soap12:Envelope",
            " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"",
            " xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"",
            " xmlns:soap12=\"http://www.w3.org/2003/05/soap-envelope\">\n",
            "  <soap12:Body>\n",
            "    <{name} xmlns=\"{xmlns}\"><![CDATA[{document}]]></{name}>\n",
            "  </soap12:Body>\n",
            "</soap12:Envelope>\n",
        ),
        name = operation.name(),
        xmlns = SERVICE_XMLNS,
        document = document,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_places_document_in_cdata() {
        let envelope = wrap(SoapOperation::SubmitLotSync, "<EnviarLoteRpsSincronoEnvio/>");
        assert!(envelope.contains(
            "<EnviarLoteRpsSincrono xmlns=\"http://www.issnetonline.com.br/webservice/nfse\">"
        ));
        assert!(envelope.contains("<![CDATA[<EnviarLoteRpsSincronoEnvio/>]]>"));
        assert!(envelope.contains("</EnviarLoteRpsSincrono>"));
        assert!(envelope.contains("http://www.w3.org/2003/05/soap-envelope"));
    }

    #[test]
    fn test_soap_action_names_the_operation() {
        assert_eq!(
            SoapOperation::Cancel.soap_action(),
            "http://www.issnetonline.com.br/webservice/nfse/CancelarNfse"
        );
        assert_eq!(SoapOperation::QueryLot.name(), "ConsultarLoteRps");
    }
}

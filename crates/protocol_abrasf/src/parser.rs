//! Structural parsing of authority responses
//!
//! The authority nests the ABRASF result document inside the SOAP body,
//! usually CDATA-wrapped or entity-escaped. [`parse`] cleans the payload
//! and walks it with an event reader, so extraction never depends on
//! whitespace or attribute order. Regex never touches response handling.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One issued invoice extracted from a response.
///
/// Period queries return several of these; submit and number queries
/// return one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfseRecord {
    pub number: Option<String>,
    pub verification_code: Option<String>,
}

/// The authority's reply, decomposed.
///
/// Authority-signaled failures live in `errors`/`fault` verbatim; the
/// cleaned XML is retained for audit regardless of outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityResponse {
    pub protocol: Option<String>,
    pub records: Vec<NfseRecord>,
    pub errors: Vec<String>,
    pub fault: Option<String>,
    pub raw_xml: String,
}

impl AuthorityResponse {
    /// True iff the authority signaled no error message and no fault
    pub fn success(&self) -> bool {
        self.errors.is_empty() && self.fault.is_none()
    }

    /// The first extracted invoice record, if any
    pub fn first_record(&self) -> Option<&NfseRecord> {
        self.records.first()
    }

    /// Every authority-supplied failure string, fault included
    pub fn error_messages(&self) -> Vec<String> {
        let mut messages = self.errors.clone();
        if let Some(fault) = &self.fault {
            messages.push(fault.clone());
        }
        messages
    }
}

/// Removes CDATA wrapping and, when the payload is an entity-escaped
/// inner document, decodes it back into markup
fn clean_payload(raw: &str) -> String {
    let cleaned = raw.replace("<![CDATA[", "").replace("]]>", "");
    if cleaned.contains("&lt;") {
        decode_entities(&cleaned)
    } else {
        cleaned
    }
}

/// Decodes the five predefined XML entities; `&amp;` last so already
/// decoded markers are not double-expanded
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn join_message(code: Option<String>, text: Option<String>) -> String {
    match (code, text) {
        (Some(code), Some(text)) => format!("{code}: {text}"),
        (Some(code), None) => code,
        (None, Some(text)) => text,
        (None, None) => "unspecified authority error".to_string(),
    }
}

/// Parses a raw authority response into its structural parts.
///
/// Extraction rules:
/// - `protocol` comes from the first `<Protocolo>`
/// - each `<InfNfse>` block yields one [`NfseRecord`] with its own
///   `<Numero>` and `<CodigoVerificacao>`; a bare `<Numero>` outside any
///   block still yields a single record
/// - every `<MensagemRetorno>` contributes one error string (code and
///   message joined), a SOAP fault contributes `fault`
pub fn parse(raw: &str) -> Result<AuthorityResponse, ParseError> {
    let cleaned = clean_payload(raw);
    let mut reader = Reader::from_str(&cleaned);

    let mut protocol: Option<String> = None;
    let mut records: Vec<NfseRecord> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut fault: Option<String> = None;

    let mut loose_number: Option<String> = None;
    let mut loose_code: Option<String> = None;

    let mut stack: Vec<String> = Vec::new();
    let mut record: Option<NfseRecord> = None;
    let mut message: Option<(Option<String>, Option<String>)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                match name.as_str() {
                    "InfNfse" => record = Some(NfseRecord::default()),
                    "MensagemRetorno" => message = Some((None, None)),
                    _ => {}
                }
                stack.push(name);
            }
            Event::End(e) => {
                match local_name(e.local_name().as_ref()).as_str() {
                    "InfNfse" => {
                        if let Some(finished) = record.take() {
                            records.push(finished);
                        }
                    }
                    "MensagemRetorno" => {
                        if let Some((code, text)) = message.take() {
                            errors.push(join_message(code, text));
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
            Event::Text(t) => {
                let text = decode_entities(String::from_utf8_lossy(t.as_ref()).trim());
                if text.is_empty() {
                    continue;
                }
                let Some(element) = stack.last().map(String::as_str) else {
                    continue;
                };
                let parent = (stack.len() >= 2).then(|| stack[stack.len() - 2].as_str());

                match element {
                    "Protocolo" if message.is_none() => {
                        if protocol.is_none() {
                            protocol = Some(text);
                        }
                    }
                    // RPS numbers share the tag name; only the invoice's
                    // own number counts.
                    "Numero" if message.is_none() && parent != Some("IdentificacaoRps") => {
                        if let Some(current) = record.as_mut() {
                            if parent == Some("InfNfse") && current.number.is_none() {
                                current.number = Some(text);
                            }
                        } else if loose_number.is_none() {
                            loose_number = Some(text);
                        }
                    }
                    "CodigoVerificacao" if message.is_none() => {
                        if let Some(current) = record.as_mut() {
                            if current.verification_code.is_none() {
                                current.verification_code = Some(text);
                            }
                        } else if loose_code.is_none() {
                            loose_code = Some(text);
                        }
                    }
                    "Codigo" => {
                        if let Some((code, _)) = message.as_mut() {
                            if code.is_none() {
                                *code = Some(text);
                            }
                        }
                    }
                    "Mensagem" => {
                        if let Some((_, msg)) = message.as_mut() {
                            if msg.is_none() {
                                *msg = Some(text);
                            }
                        }
                    }
                    "faultstring" => {
                        if fault.is_none() {
                            fault = Some(text);
                        }
                    }
                    // SOAP 1.2 spells the fault as Reason/Text.
                    "Text" if parent == Some("Reason") => {
                        if fault.is_none() {
                            fault = Some(text);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if records.is_empty() && (loose_number.is_some() || loose_code.is_some()) {
        records.push(NfseRecord {
            number: loose_number,
            verification_code: loose_code,
        });
    }

    Ok(AuthorityResponse {
        protocol,
        records,
        errors,
        fault,
        raw_xml: cleaned,
    })
}

/// Returns the first non-empty text inside the first element with the
/// given local name. This is the structural-lookup primitive callers use
/// to pull single values out of a document.
pub fn find_first_text(xml: &str, element: &str) -> Result<Option<String>, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if local_name(e.local_name().as_ref()) == element {
                    inside = true;
                }
            }
            Event::End(e) => {
                if local_name(e.local_name().as_ref()) == element {
                    inside = false;
                }
            }
            Event::Text(t) if inside => {
                let text = decode_entities(String::from_utf8_lossy(t.as_ref()).trim());
                if !text.is_empty() {
                    return Ok(Some(text));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

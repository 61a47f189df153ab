//! Masking of sensitive payload fields for logging
//!
//! Requests and responses carry personal identifiers and, on signed
//! documents, the whole signature block. Anything headed for a log line
//! or an audit trail goes through [`mask_sensitive`] first; the tag
//! structure survives so masked payloads remain diffable.

const MASK: &str = "***";

/// Tags whose text content is replaced wholesale
const MASKED_TAGS: [&str; 4] = ["Cnpj", "Cpf", "InscricaoMunicipal", "Email"];

/// Replaces the contents of sensitive elements with a placeholder,
/// preserving the surrounding tags
pub fn mask_sensitive(xml: &str) -> String {
    let mut masked = xml.to_string();
    for tag in MASKED_TAGS {
        masked = mask_element(&masked, tag);
    }
    mask_subtree(&masked, "Signature")
}

/// Masks the text content of every `<name>...</name>` occurrence
fn mask_element(xml: &str, name: &str) -> String {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(start) = rest.find(&open) {
        let content_start = start + open.len();
        let Some(content_len) = rest[content_start..].find(&close) else {
            break;
        };
        out.push_str(&rest[..content_start]);
        out.push_str(MASK);
        rest = &rest[content_start + content_len..];
    }
    out.push_str(rest);
    out
}

/// Masks an element and everything inside it, keeping only the outer
/// tags. Handles opening tags that carry attributes.
fn mask_subtree(xml: &str, name: &str) -> String {
    let close = format!("</{name}>");
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    loop {
        let Some(start) = find_element_start(rest, name) else {
            break;
        };
        let Some(open_end) = rest[start..].find('>') else {
            break;
        };
        let content_start = start + open_end + 1;
        let Some(content_len) = rest[content_start..].find(&close) else {
            break;
        };
        out.push_str(&rest[..content_start]);
        out.push_str(MASK);
        rest = &rest[content_start + content_len..];
    }
    out.push_str(rest);
    out
}

/// Finds `<name>` or `<name ...>` without matching longer tag names
fn find_element_start(xml: &str, name: &str) -> Option<usize> {
    let pattern = format!("<{name}");
    let mut offset = 0;
    while let Some(found) = xml[offset..].find(&pattern) {
        let start = offset + found;
        let after = xml[start + pattern.len()..].chars().next();
        if matches!(after, Some('>') | Some(' ') | Some('\t') | Some('\n')) {
            return Some(start);
        }
        offset = start + pattern.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_identifier_tags() {
        let xml = "<Prestador><CpfCnpj><Cnpj>12345678000195</Cnpj></CpfCnpj>\
                   <InscricaoMunicipal>0123456</InscricaoMunicipal></Prestador>";
        let masked = mask_sensitive(xml);
        assert_eq!(
            masked,
            "<Prestador><CpfCnpj><Cnpj>***</Cnpj></CpfCnpj>\
             <InscricaoMunicipal>***</InscricaoMunicipal></Prestador>"
        );
    }

    #[test]
    fn test_masks_every_occurrence() {
        let xml = "<A><Cpf>11111111111</Cpf><Cpf>22222222222</Cpf></A>";
        assert_eq!(
            mask_sensitive(xml),
            "<A><Cpf>***</Cpf><Cpf>***</Cpf></A>"
        );
    }

    #[test]
    fn test_masks_email_but_keeps_structure() {
        let xml = "<Contato><Email>maria@example.com</Email></Contato>";
        let masked = mask_sensitive(xml);
        assert!(masked.contains("<Email>***</Email>"));
        assert!(masked.starts_with("<Contato>"));
        assert!(masked.ends_with("</Contato>"));
    }

    #[test]
    fn test_masks_signature_subtree_with_attributes() {
        let xml = "<Doc><Signature xmlns=\"http://www.w3.org/2000/09/xmldsig#\">\
                   <SignedInfo><Reference URI=\"#rps42\"/></SignedInfo>\
                   <SignatureValue>abc123</SignatureValue></Signature></Doc>";
        let masked = mask_sensitive(xml);
        assert_eq!(
            masked,
            "<Doc><Signature xmlns=\"http://www.w3.org/2000/09/xmldsig#\">***</Signature></Doc>"
        );
    }

    #[test]
    fn test_does_not_touch_unrelated_tags() {
        let xml = "<CpfCnpj><Outro>123</Outro></CpfCnpj>";
        assert_eq!(mask_sensitive(xml), xml);
    }
}

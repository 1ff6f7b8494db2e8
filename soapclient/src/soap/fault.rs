//! SOAP Faults (1.1 et 1.2)

use xmltree::{Element, XMLNode};

use super::encode::decode_element;
use super::envelope::{EnvelopeBody, SoapVersion};
use crate::value::SoapValue;

/// Erreur SOAP (Fault) renvoyée par le service
#[derive(Debug, Clone, PartialEq)]
pub struct SoapFault {
    /// Code d'erreur (ex: "soap:Client", "env:Sender")
    pub code: String,

    /// Description de l'erreur
    pub message: String,

    /// Acteur (1.1) ou rôle (1.2) à l'origine du fault
    pub actor: Option<String>,

    /// Contenu décodé de `detail` / `Detail`
    pub detail: Option<SoapValue>,
}

impl SoapFault {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            actor: None,
            detail: None,
        }
    }

    /// Cherche un `Fault` dans le corps d'une enveloppe reçue
    pub fn from_body(body: &EnvelopeBody) -> Option<Self> {
        body.first_element()
            .filter(|e| e.name == "Fault")
            .map(Self::from_element)
    }

    /// Lit un élément `Fault`, quelle que soit la version SOAP
    pub fn from_element(fault: &Element) -> Self {
        if fault.get_child("Code").is_some() || fault.get_child("Reason").is_some() {
            // SOAP 1.2
            let code = fault
                .get_child("Code")
                .and_then(|c| c.get_child("Value"))
                .map(text_of)
                .unwrap_or_default();
            let message = fault
                .get_child("Reason")
                .and_then(|r| r.get_child("Text"))
                .map(text_of)
                .unwrap_or_default();
            Self {
                code,
                message,
                actor: fault.get_child("Role").map(text_of),
                detail: fault.get_child("Detail").map(decode_element),
            }
        } else {
            Self {
                code: fault.get_child("faultcode").map(text_of).unwrap_or_default(),
                message: fault
                    .get_child("faultstring")
                    .map(text_of)
                    .unwrap_or_default(),
                actor: fault.get_child("faultactor").map(text_of),
                detail: fault.get_child("detail").map(decode_element),
            }
        }
    }
}

fn text_of(elem: &Element) -> String {
    elem.get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

/// Construit un SOAP Fault XML
///
/// Sert surtout aux serveurs de test et aux doublures de transport.
pub fn build_soap_fault(
    version: SoapVersion,
    code: &str,
    message: &str,
    detail: Option<&str>,
) -> Result<String, xmltree::Error> {
    let mut fault = Element::new("SOAP-ENV:Fault");

    match version {
        SoapVersion::V1_1 => {
            fault
                .children
                .push(XMLNode::Element(text_element("faultcode", code)));
            fault
                .children
                .push(XMLNode::Element(text_element("faultstring", message)));
            if let Some(detail) = detail {
                fault
                    .children
                    .push(XMLNode::Element(text_element("detail", detail)));
            }
        }
        SoapVersion::V1_2 => {
            let mut code_elem = Element::new("SOAP-ENV:Code");
            code_elem
                .children
                .push(XMLNode::Element(text_element("SOAP-ENV:Value", code)));
            fault.children.push(XMLNode::Element(code_elem));

            let mut reason = Element::new("SOAP-ENV:Reason");
            reason
                .children
                .push(XMLNode::Element(text_element("SOAP-ENV:Text", message)));
            fault.children.push(XMLNode::Element(reason));

            if let Some(detail) = detail {
                fault
                    .children
                    .push(XMLNode::Element(text_element("SOAP-ENV:Detail", detail)));
            }
        }
    }

    let mut body = Element::new("SOAP-ENV:Body");
    body.children.push(XMLNode::Element(fault));

    let mut envelope = Element::new("SOAP-ENV:Envelope");
    envelope.attributes.insert(
        "xmlns:SOAP-ENV".to_string(),
        version.envelope_ns().to_string(),
    );
    envelope.children.push(XMLNode::Element(body));

    super::builder::write_element(&envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::parse_soap_envelope;

    #[test]
    fn test_fault_11_roundtrip() {
        let xml = build_soap_fault(SoapVersion::V1_1, "SOAP-ENV:Client", "Invalid currency", Some("XYZ"))
            .unwrap();
        assert!(xml.contains("<faultcode>SOAP-ENV:Client</faultcode>"));

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        let fault = SoapFault::from_body(&envelope.body).unwrap();
        assert_eq!(fault.code, "SOAP-ENV:Client");
        assert_eq!(fault.message, "Invalid currency");
        assert_eq!(fault.detail, Some(SoapValue::String("XYZ".to_string())));
    }

    #[test]
    fn test_fault_12() {
        let xml = r#"<?xml version="1.0"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <env:Fault>
      <env:Code><env:Value>env:Sender</env:Value></env:Code>
      <env:Reason><env:Text xml:lang="en">Bad symbol</env:Text></env:Reason>
      <env:Role>http://example.com/quotes</env:Role>
    </env:Fault>
  </env:Body>
</env:Envelope>"#;

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        let fault = SoapFault::from_body(&envelope.body).unwrap();
        assert_eq!(fault.code, "env:Sender");
        assert_eq!(fault.message, "Bad symbol");
        assert_eq!(fault.actor.as_deref(), Some("http://example.com/quotes"));
        assert!(fault.detail.is_none());
    }
}

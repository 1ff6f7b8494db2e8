//! Structures de l'enveloppe SOAP

use xmltree::Element;

use crate::value::SoapValue;

pub const SOAP11_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP12_ENV_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Version du protocole SOAP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    #[default]
    V1_1,
    V1_2,
}

impl SoapVersion {
    /// Namespace de l'enveloppe pour cette version
    pub fn envelope_ns(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => SOAP11_ENV_NS,
            SoapVersion::V1_2 => SOAP12_ENV_NS,
        }
    }

    /// Interprète "1.1", "1.2", "11", "12", "soap12"...
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1.1" | "11" | "soap11" | "soap1.1" => Some(SoapVersion::V1_1),
            "1.2" | "12" | "soap12" | "soap1.2" => Some(SoapVersion::V1_2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoapVersion::V1_1 => "1.1",
            SoapVersion::V1_2 => "1.2",
        }
    }
}

/// Style de binding déclaré par le WSDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingStyle {
    #[default]
    Document,
    Rpc,
}

/// En-tête SOAP sortant, ajouté aux requêtes d'un service
#[derive(Debug, Clone, PartialEq)]
pub struct SoapHeader {
    pub namespace: String,
    pub name: String,
    pub data: SoapValue,
    pub must_understand: bool,
    pub actor: Option<String>,
}

impl SoapHeader {
    pub fn new(namespace: &str, name: &str, data: impl Into<SoapValue>) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            data: data.into(),
            must_understand: false,
            actor: None,
        }
    }

    pub fn must_understand(mut self, value: bool) -> Self {
        self.must_understand = value;
        self
    }

    pub fn actor(mut self, actor: &str) -> Self {
        self.actor = Some(actor.to_string());
        self
    }
}

/// Enveloppe SOAP reçue
#[derive(Debug, Clone)]
pub struct SoapEnvelope {
    /// En-tête SOAP optionnel
    pub header: Option<EnvelopeHeader>,

    /// Corps SOAP contenant la réponse ou le fault
    pub body: EnvelopeBody,
}

/// En-tête d'une enveloppe reçue
#[derive(Debug, Clone)]
pub struct EnvelopeHeader {
    pub content: Element,
}

/// Corps d'une enveloppe reçue
#[derive(Debug, Clone)]
pub struct EnvelopeBody {
    pub content: Element,
}

impl EnvelopeBody {
    /// Premier élément enfant du corps (réponse ou fault)
    pub fn first_element(&self) -> Option<&Element> {
        self.content.children.iter().find_map(|n| n.as_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(SoapVersion::parse("1.1"), Some(SoapVersion::V1_1));
        assert_eq!(SoapVersion::parse(" SOAP12 "), Some(SoapVersion::V1_2));
        assert_eq!(SoapVersion::parse("2.0"), None);
        assert_eq!(SoapVersion::default().as_str(), "1.1");
    }
}

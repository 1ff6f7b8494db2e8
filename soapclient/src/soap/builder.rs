//! Construction des requêtes SOAP

use xmltree::{Element, XMLNode};

use super::encode::{encode_value, is_element_name, new_element};
use super::envelope::{BindingStyle, SoapHeader, SoapVersion};
use crate::errors::ClientError;
use crate::value::SoapValue;
use crate::var::{SOAP_ENC_NS, XSD_NS, XSI_NS};

/// Préfixe du namespace de la méthode appelée
const METHOD_PREFIX: &str = "ns1";

/// Sérialise un élément racine en document XML
pub(crate) fn write_element(root: &Element) -> Result<String, xmltree::Error> {
    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    root.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Description d'une requête SOAP à sérialiser
#[derive(Debug, Clone, Copy)]
pub struct SoapRequest<'a> {
    pub version: SoapVersion,
    pub style: BindingStyle,
    /// Namespace de la méthode (option `uri` ou targetNamespace du WSDL)
    pub namespace: &'a str,
    pub method: &'a str,
    pub params: &'a SoapValue,
    pub headers: &'a [SoapHeader],
}

/// Construit l'enveloppe XML d'un appel
///
/// Les paramètres sont placés sous `<ns1:method>` :
/// - un `Map` donne un élément par entrée (une clé vide devient `paramN`)
/// - un `Array` donne un élément par valeur, nommé par la `SoapVar` si elle
///   porte un nom de nœud, sinon `paramN`
/// - `Null` ne produit aucun argument
/// - toute autre valeur devient `param0`
///
/// Un nom de méthode ou de paramètre qui n'est pas un nom XML valide donne
/// [`ClientError::InvalidElementName`].
pub fn build_soap_request(request: &SoapRequest<'_>) -> Result<String, ClientError> {
    let mut method_elem = new_element(&format!("{}:{}", METHOD_PREFIX, request.method))?;
    method_elem.attributes.insert(
        format!("xmlns:{}", METHOD_PREFIX),
        request.namespace.to_string(),
    );

    match request.params {
        SoapValue::Null => {}
        SoapValue::Map(entries) => {
            for (index, (name, value)) in entries.iter().enumerate() {
                let elem = if name.is_empty() {
                    encode_value(&format!("param{}", index), value)?
                } else {
                    encode_value(name, value)?
                };
                push(&mut method_elem, elem);
            }
        }
        SoapValue::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                push(&mut method_elem, encode_value(&format!("param{}", index), value)?);
            }
        }
        other => push(&mut method_elem, encode_value("param0", other)?),
    }

    let mut envelope = Element::new("SOAP-ENV:Envelope");
    envelope.attributes.insert(
        "xmlns:SOAP-ENV".to_string(),
        request.version.envelope_ns().to_string(),
    );
    envelope
        .attributes
        .insert("xmlns:xsd".to_string(), XSD_NS.to_string());
    envelope
        .attributes
        .insert("xmlns:xsi".to_string(), XSI_NS.to_string());
    envelope
        .attributes
        .insert("xmlns:SOAP-ENC".to_string(), SOAP_ENC_NS.to_string());
    if request.style == BindingStyle::Rpc {
        envelope.attributes.insert(
            "SOAP-ENV:encodingStyle".to_string(),
            SOAP_ENC_NS.to_string(),
        );
    }

    if !request.headers.is_empty() {
        let mut header = Element::new("SOAP-ENV:Header");
        for (index, soap_header) in request.headers.iter().enumerate() {
            push(&mut header, build_header(request.version, index, soap_header)?);
        }
        push(&mut envelope, header);
    }

    let mut body = Element::new("SOAP-ENV:Body");
    push(&mut body, method_elem);
    push(&mut envelope, body);

    Ok(write_element(&envelope)?)
}

fn build_header(
    version: SoapVersion,
    index: usize,
    header: &SoapHeader,
) -> Result<Element, ClientError> {
    let prefix = format!("h{}", index);
    let name = format!("{}:{}", prefix, header.name);
    if !is_element_name(&name) {
        return Err(ClientError::InvalidElementName(header.name.clone()));
    }
    let mut elem = encode_value(&name, &header.data)?;
    // Le nom de nœud d'une SoapVar ne remplace pas l'élément d'en-tête
    elem.name = name;
    elem.attributes
        .insert(format!("xmlns:{}", prefix), header.namespace.clone());

    if header.must_understand {
        let flag = match version {
            SoapVersion::V1_1 => "1",
            SoapVersion::V1_2 => "true",
        };
        elem.attributes
            .insert("SOAP-ENV:mustUnderstand".to_string(), flag.to_string());
    }

    if let Some(actor) = &header.actor {
        let attr = match version {
            SoapVersion::V1_1 => "SOAP-ENV:actor",
            SoapVersion::V1_2 => "SOAP-ENV:role",
        };
        elem.attributes.insert(attr.to_string(), actor.clone());
    }

    Ok(elem)
}

fn push(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

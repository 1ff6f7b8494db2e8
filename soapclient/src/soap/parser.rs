//! Parser des réponses SOAP

use std::io::BufReader;

use xmltree::Element;

use super::encode::decode_element;
use super::envelope::{EnvelopeBody, EnvelopeHeader, SoapEnvelope};
use super::fault::SoapFault;
use crate::errors::ClientError;
use crate::value::SoapValue;

/// Parse une enveloppe SOAP complète
pub fn parse_soap_envelope(xml: &[u8]) -> Result<SoapEnvelope, ClientError> {
    let reader = BufReader::new(xml);
    let root = Element::parse(reader)?;

    if root.name != "Envelope" {
        return Err(ClientError::MissingEnvelope);
    }

    let header = root
        .get_child("Header")
        .map(|e| EnvelopeHeader { content: e.clone() });

    let body = root
        .get_child("Body")
        .map(|e| EnvelopeBody { content: e.clone() })
        .ok_or(ClientError::MissingBody)?;

    Ok(SoapEnvelope { header, body })
}

/// Extrait la valeur de retour d'une enveloppe reçue
///
/// Un `Fault` est converti en [`ClientError::Fault`]. Sinon le premier
/// enfant du corps (`<methodResponse>`) est décodé : un seul enfant donne
/// directement sa valeur, plusieurs enfants donnent un `Map` (ou un `Array`
/// s'ils portent tous le même nom), aucun donne `Null`.
pub fn decode_response(envelope: &SoapEnvelope) -> Result<SoapValue, ClientError> {
    if let Some(fault) = SoapFault::from_body(&envelope.body) {
        return Err(ClientError::Fault(fault));
    }

    let Some(response) = envelope.body.first_element() else {
        return Ok(SoapValue::Null);
    };

    let has_children = response.children.iter().any(|n| n.as_element().is_some());
    let has_text = response
        .get_text()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    if !has_children && !has_text {
        return Ok(SoapValue::Null);
    }

    Ok(match decode_element(response) {
        SoapValue::Map(mut entries) if entries.len() == 1 => entries.remove(0).1,
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_return() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <GetConversionAmountResponse xmlns="http://tempuri.org/">
      <GetConversionAmountResult>108.50</GetConversionAmountResult>
    </GetConversionAmountResponse>
  </soap:Body>
</soap:Envelope>"#;

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        assert!(envelope.header.is_none());
        let value = decode_response(&envelope).unwrap();
        assert_eq!(value, SoapValue::String("108.50".to_string()));
    }

    #[test]
    fn test_parse_multiple_returns() {
        let xml = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Header><Session>42</Session></s:Header>
  <s:Body>
    <ns1:GetQuoteResponse xmlns:ns1="urn:quotes">
      <Symbol>ACME</Symbol>
      <Price>12.5</Price>
    </ns1:GetQuoteResponse>
  </s:Body>
</s:Envelope>"#;

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        assert!(envelope.header.is_some());
        let value = decode_response(&envelope).unwrap();
        assert_eq!(value.get("Symbol").and_then(SoapValue::as_str), Some("ACME"));
        assert_eq!(value.get("Price").and_then(SoapValue::as_str), Some("12.5"));
    }

    #[test]
    fn test_parse_empty_response() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body><ns1:PingResponse xmlns:ns1="urn:ping"/></s:Body>
</s:Envelope>"#;

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        assert_eq!(decode_response(&envelope).unwrap(), SoapValue::Null);
    }

    #[test]
    fn test_fault_is_an_error() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <s:Fault><faultcode>s:Server</faultcode><faultstring>Boom</faultstring></s:Fault>
  </s:Body>
</s:Envelope>"#;

        let envelope = parse_soap_envelope(xml.as_bytes()).unwrap();
        let err = decode_response(&envelope).unwrap_err();
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.code, "s:Server");
        assert_eq!(fault.message, "Boom");
    }

    #[test]
    fn test_not_an_envelope() {
        let err = parse_soap_envelope(b"<html><body/></html>").unwrap_err();
        assert!(matches!(err, ClientError::MissingEnvelope));

        let err = parse_soap_envelope(
            br#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"/>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::MissingBody));
    }
}

//! Conversion entre [`SoapValue`] et éléments XML

use std::collections::HashSet;

use xmltree::{Element, XMLNode};

use crate::errors::ClientError;
use crate::value::SoapValue;
use crate::var::SoapVar;

const ITEM_NAME: &str = "item";

/// Vérifie qu'un nom peut servir de nom d'élément XML
///
/// Un seul préfixe est admis (`h0:Token`) ; chaque partie doit être un
/// NCName : une lettre ou `_` puis lettres, chiffres, `-`, `_` ou `.`.
pub(crate) fn is_element_name(name: &str) -> bool {
    let mut parts = name.split(':');
    let valid = |part: &str| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
            }
            _ => false,
        }
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), None, _) => valid(local),
        (Some(prefix), Some(local), None) => valid(prefix) && valid(local),
        _ => false,
    }
}

pub(crate) fn new_element(name: &str) -> Result<Element, ClientError> {
    if !is_element_name(name) {
        return Err(ClientError::InvalidElementName(name.to_string()));
    }
    Ok(Element::new(name))
}

/// Encode une valeur sous la forme d'un élément nommé `name`
pub(crate) fn encode_value(name: &str, value: &SoapValue) -> Result<Element, ClientError> {
    match value {
        SoapValue::Var(var) => encode_var(name, var),
        _ => {
            let mut elem = new_element(name)?;
            fill_element(&mut elem, value)?;
            Ok(elem)
        }
    }
}

fn fill_element(elem: &mut Element, value: &SoapValue) -> Result<(), ClientError> {
    match value {
        SoapValue::Null => {
            elem.attributes
                .insert("xsi:nil".to_string(), "true".to_string());
        }
        SoapValue::Array(items) => {
            for item in items {
                push_child(elem, encode_value(ITEM_NAME, item)?);
            }
        }
        SoapValue::Map(entries) => {
            for (key, item) in entries {
                push_child(elem, encode_value(key, item)?);
            }
        }
        SoapValue::Object(obj) => {
            if let Some(class) = &obj.class {
                elem.attributes.insert("xsi:type".to_string(), class.clone());
            }
            for (key, item) in &obj.fields {
                push_child(elem, encode_value(key, item)?);
            }
        }
        SoapValue::Var(var) => {
            // Var imbriquée sans nom propre : elle prend le nom du parent
            let inner = encode_var(&elem.name, var)?;
            elem.attributes.extend(inner.attributes);
            elem.children.extend(inner.children);
        }
        scalar => {
            if let Some(text) = scalar.scalar_text() {
                elem.children.push(XMLNode::Text(text));
            }
        }
    }
    Ok(())
}

fn encode_var(name: &str, var: &SoapVar) -> Result<Element, ClientError> {
    let node_name = var.node_name.as_deref().unwrap_or(name);
    let mut elem = new_element(node_name)?;
    fill_element(&mut elem, &var.value)?;

    if let Some(ns) = &var.node_namespace {
        elem.attributes.insert("xmlns".to_string(), ns.clone());
    }

    match (&var.type_name, &var.type_namespace) {
        (Some(type_name), Some(type_ns)) => {
            elem.attributes
                .insert("xmlns:vt".to_string(), type_ns.clone());
            elem.attributes
                .insert("xsi:type".to_string(), format!("vt:{}", type_name));
        }
        (Some(type_name), None) => {
            elem.attributes
                .insert("xsi:type".to_string(), type_name.clone());
        }
        _ => {
            if let Some(xsi_type) = var.encoding.xsi_type() {
                elem.attributes
                    .insert("xsi:type".to_string(), xsi_type.to_string());
            }
        }
    }

    Ok(elem)
}

fn push_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

/// Décode un élément XML reçu
///
/// - `xsi:nil` donne `Null`
/// - un élément sans enfant élément donne son texte
/// - des enfants portant tous le même nom (au moins deux) donnent un `Array`
/// - sinon un `Map` ordonné
pub(crate) fn decode_element(elem: &Element) -> SoapValue {
    if is_nil(elem) {
        return SoapValue::Null;
    }

    let children: Vec<&Element> = elem.children.iter().filter_map(|n| n.as_element()).collect();

    if children.is_empty() {
        let text = elem.get_text().map(|t| t.into_owned()).unwrap_or_default();
        return SoapValue::String(text);
    }

    let names: HashSet<&str> = children.iter().map(|c| c.name.as_str()).collect();
    if children.len() > 1 && names.len() == 1 {
        return SoapValue::Array(children.into_iter().map(decode_element).collect());
    }

    SoapValue::Map(
        children
            .into_iter()
            .map(|c| (c.name.clone(), decode_element(c)))
            .collect(),
    )
}

fn is_nil(elem: &Element) -> bool {
    ["nil", "xsi:nil"].iter().any(|key| {
        elem.attributes
            .get(*key)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SoapObject;
    use crate::var::Encoding;

    fn child<'a>(elem: &'a Element, name: &str) -> &'a Element {
        elem.get_child(name).unwrap()
    }

    #[test]
    fn test_encode_scalar_and_null() {
        let elem = encode_value("Amount", &SoapValue::from(12)).unwrap();
        assert_eq!(elem.get_text().unwrap(), "12");

        let elem = encode_value("Comment", &SoapValue::Null).unwrap();
        assert_eq!(elem.attributes.get("xsi:nil").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_encode_collections() {
        let elem = encode_value("Symbols", &SoapValue::from(vec!["A", "B"])).unwrap();
        let items: Vec<_> = elem.children.iter().filter_map(|n| n.as_element()).collect();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|e| e.name == "item"));

        let elem = encode_value("Pair", &SoapValue::map([("From", "EUR"), ("To", "USD")])).unwrap();
        assert_eq!(child(&elem, "From").get_text().unwrap(), "EUR");
        assert_eq!(child(&elem, "To").get_text().unwrap(), "USD");
    }

    #[test]
    fn test_encode_var_with_node_and_type() {
        let obj = SoapObject::new().field("Symbol", "ACME");
        let var = SoapVar::new(obj, Encoding::Object)
            .with_node("request", None)
            .with_type("QuoteRequest", Some("urn:quotes"));

        let elem = encode_value("param0", &SoapValue::from(var)).unwrap();
        assert_eq!(elem.name, "request");
        assert_eq!(
            elem.attributes.get("xsi:type").map(String::as_str),
            Some("vt:QuoteRequest")
        );
        assert_eq!(
            elem.attributes.get("xmlns:vt").map(String::as_str),
            Some("urn:quotes")
        );
        assert_eq!(child(&elem, "Symbol").get_text().unwrap(), "ACME");
    }

    #[test]
    fn test_encode_var_default_type() {
        let var = SoapVar::new(3, Encoding::Int);
        let elem = encode_value("count", &SoapValue::from(var)).unwrap();
        assert_eq!(elem.name, "count");
        assert_eq!(elem.attributes.get("xsi:type").map(String::as_str), Some("xsd:int"));
    }

    #[test]
    fn test_element_names() {
        for name in ["Amount", "_x", "h0:Token", "Rate-Date", "é1"] {
            assert!(is_element_name(name), "{}", name);
        }
        for name in ["", "1abc", "a b", "<x>", "a:b:c", ":a", "a:"] {
            assert!(!is_element_name(name), "{:?}", name);
        }
    }

    #[test]
    fn test_encode_rejects_invalid_names() {
        let err = encode_value("", &SoapValue::from(5)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidElementName(name) if name.is_empty()));

        let nested = SoapValue::map([("ok", SoapValue::map([("not valid", 1)]))]);
        let err = encode_value("root", &nested).unwrap_err();
        assert!(matches!(err, ClientError::InvalidElementName(name) if name == "not valid"));
    }

    #[test]
    fn test_decode_shapes() {
        let xml = r#"<root>
            <Rate>1.08</Rate>
            <Pairs><item>EUR</item><item>USD</item></Pairs>
            <Empty xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:nil="true"/>
        </root>"#;
        let root = Element::parse(xml.as_bytes()).unwrap();
        let value = decode_element(&root);

        assert_eq!(value.get("Rate").and_then(SoapValue::as_str), Some("1.08"));
        assert_eq!(
            value.get("Pairs").and_then(SoapValue::as_array).map(|a| a.len()),
            Some(2)
        );
        assert!(value.get("Empty").unwrap().is_null());
    }
}

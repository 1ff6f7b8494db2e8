//! Lecture minimale des documents WSDL
//!
//! Seules les informations utiles à un client sont extraites : namespace
//! cible, opérations (avec leur `soapAction`), style de binding et adresses
//! des ports SOAP.

use std::collections::HashMap;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::debug;

use crate::errors::{ClientError, WsdlError};
use crate::soap::{BindingStyle, SoapVersion};
use crate::transport::Transport;

const WSDL_SOAP11_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const WSDL_SOAP12_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlOperation {
    pub name: String,
    pub soap_action: Option<String>,
}

/// Port SOAP déclaré dans `<service>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsdlPort {
    pub name: String,
    pub location: String,
    pub version: SoapVersion,
}

#[derive(Debug, Clone, Default)]
pub struct WsdlDocument {
    pub target_namespace: Option<String>,
    pub operations: Vec<WsdlOperation>,
    pub ports: Vec<WsdlPort>,
    pub style: BindingStyle,
}

impl WsdlDocument {
    /// Charge un WSDL depuis une URL http(s) ou un fichier local
    pub fn load(source: &str, transport: &dyn Transport) -> Result<Self, ClientError> {
        let xml = if source.starts_with("http://") || source.starts_with("https://") {
            debug!(wsdl = %source, "Fetching WSDL");
            transport.get(source)?
        } else {
            let path = source.strip_prefix("file://").unwrap_or(source);
            debug!(wsdl = %path, "Reading WSDL file");
            std::fs::read_to_string(path)?
        };

        Ok(Self::parse(xml.as_bytes())?)
    }

    /// Parse un document WSDL 1.1
    pub fn parse(xml: &[u8]) -> Result<Self, WsdlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut doc = WsdlDocument::default();
        let mut state = ParseState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    doc.visit(&e, &name, &mut state)?;
                    state.stack.push(name);
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    doc.visit(&e, &name, &mut state)?;
                }
                Event::End(_) => {
                    if let Some(name) = state.stack.pop() {
                        match (name.as_str(), state.parent()) {
                            ("operation", Some("binding")) => state.binding_operation = None,
                            ("port", Some("service")) => state.port = None,
                            _ => {}
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !state.seen_root {
            return Err(WsdlError::NotAWsdl(String::new()));
        }

        debug!(
            operations = doc.operations.len(),
            ports = doc.ports.len(),
            "Parsed WSDL"
        );
        Ok(doc)
    }

    fn visit(
        &mut self,
        e: &BytesStart<'_>,
        name: &str,
        state: &mut ParseState,
    ) -> Result<(), WsdlError> {
        state.collect_namespaces(e);

        if !state.seen_root {
            if name != "definitions" {
                return Err(WsdlError::NotAWsdl(name.to_string()));
            }
            state.seen_root = true;
            self.target_namespace = attr_value(e, b"targetNamespace");
            return Ok(());
        }

        match (name, state.parent(), state.grandparent()) {
            ("operation", Some("portType"), _) => {
                if let Some(op) = attr_value(e, b"name") {
                    self.ensure_operation(&op);
                }
            }
            ("operation", Some("binding"), _) => {
                if let Some(op) = attr_value(e, b"name") {
                    self.ensure_operation(&op);
                    state.binding_operation = Some(op);
                }
            }
            ("operation", Some("operation"), Some("binding")) => {
                let action = attr_value(e, b"soapAction").filter(|a| !a.is_empty());
                if let (Some(op), Some(action)) = (&state.binding_operation, action) {
                    if let Some(entry) = self.operations.iter_mut().find(|o| &o.name == op) {
                        entry.soap_action = Some(action);
                    }
                }
            }
            ("binding", Some("binding"), _) => {
                if attr_value(e, b"style").as_deref() == Some("rpc") {
                    self.style = BindingStyle::Rpc;
                }
            }
            ("port", Some("service"), _) => {
                state.port = attr_value(e, b"name");
            }
            ("address", Some("port"), _) => {
                let ns = prefix(e).and_then(|p| state.namespaces.get(&p).cloned());
                let version = match ns.as_deref() {
                    Some(WSDL_SOAP12_NS) => Some(SoapVersion::V1_2),
                    Some(WSDL_SOAP11_NS) | None => Some(SoapVersion::V1_1),
                    // http:address et autres bindings non SOAP
                    Some(_) => None,
                };
                if let (Some(version), Some(location)) = (version, attr_value(e, b"location")) {
                    self.ports.push(WsdlPort {
                        name: state.port.clone().unwrap_or_default(),
                        location,
                        version,
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn ensure_operation(&mut self, name: &str) {
        if !self.has_operation(name) {
            self.operations.push(WsdlOperation {
                name: name.to_string(),
                soap_action: None,
            });
        }
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operation(name).is_some()
    }

    pub fn operation(&self, name: &str) -> Option<&WsdlOperation> {
        self.operations.iter().find(|o| o.name == name)
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.operations.iter().map(|o| o.name.clone()).collect()
    }

    /// Port correspondant à la version demandée, sinon le premier port
    pub fn endpoint(&self, version: SoapVersion) -> Option<&WsdlPort> {
        self.ports
            .iter()
            .find(|p| p.version == version)
            .or_else(|| self.ports.first())
    }
}

#[derive(Debug, Default)]
struct ParseState {
    seen_root: bool,
    stack: Vec<String>,
    namespaces: HashMap<String, String>,
    binding_operation: Option<String>,
    port: Option<String>,
}

impl ParseState {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn grandparent(&self) -> Option<&str> {
        let len = self.stack.len();
        if len >= 2 {
            Some(self.stack[len - 2].as_str())
        } else {
            None
        }
    }

    // Les déclarations sont rarement redéfinies dans un WSDL : une table
    // plate suffit.
    fn collect_namespaces(&mut self, e: &BytesStart<'_>) {
        for attr in e.attributes().flatten() {
            let key = attr.key.as_ref();
            if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                self.namespaces.insert(
                    String::from_utf8_lossy(prefix).into_owned(),
                    String::from_utf8_lossy(&attr.value).into_owned(),
                );
            }
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn prefix(e: &BytesStart<'_>) -> Option<String> {
    e.name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    let attr = e
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)?;
    let raw = String::from_utf8_lossy(&attr.value).into_owned();
    match quick_xml::escape::unescape(&raw) {
        Ok(value) => Some(value.into_owned()),
        Err(_) => Some(raw),
    }
}

use thiserror::Error;

use crate::soap::SoapFault;

#[derive(Error, Debug)]
pub enum WsdlError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document is not a WSDL (root element is {0})")]
    NotAWsdl(String),

    #[error("WSDL does not declare any SOAP address")]
    MissingAddress,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WSDL error: {0}")]
    Wsdl(#[from] WsdlError),

    #[error("XML parse error: {0}")]
    Xml(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    Emit(#[from] xmltree::Error),

    #[error("SOAP Fault {}: {}", .0.code, .0.message)]
    Fault(SoapFault),

    #[error("SOAP call failed with HTTP status {status} and body: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid client options: {0}")]
    InvalidOptions(String),

    #[error("No endpoint location available for this client")]
    MissingLocation,

    #[error("Function \"{0}\" is not a valid method for this service")]
    UnknownOperation(String),

    #[error("\"{0}\" is not a valid XML element name")]
    InvalidElementName(String),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,
}

impl ClientError {
    pub fn invalid_options(message: &str) -> Self {
        ClientError::InvalidOptions(message.to_string())
    }

    /// Retourne le fault SOAP si l'erreur en est un
    pub fn as_fault(&self) -> Option<&SoapFault> {
        match self {
            ClientError::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

//! # Module SOAP - Simple Object Access Protocol
//!
//! Ce module sérialise les appels SOAP et interprète les réponses.
//!
//! ## Fonctionnalités
//!
//! - Construction d'enveloppes SOAP 1.1 et 1.2 (en-têtes compris)
//! - Encodage des [`SoapValue`](crate::SoapValue) et des variables typées
//! - Parsing des enveloppes reçues et décodage de la valeur de retour
//! - Lecture des SOAP Faults des deux versions
//!
//! ## Example
//!
//! ```ignore
//! use soapclient::soap::{build_soap_request, SoapRequest, SoapVersion, BindingStyle};
//! use soapclient::SoapValue;
//!
//! let params = SoapValue::map([("CurrencyFrom", "EUR"), ("CurrencyTo", "USD")]);
//! let xml = build_soap_request(&SoapRequest {
//!     version: SoapVersion::V1_1,
//!     style: BindingStyle::Document,
//!     namespace: "http://tempuri.org/",
//!     method: "GetConversionAmount",
//!     params: &params,
//!     headers: &[],
//! })?;
//! ```

mod builder;
mod encode;
mod envelope;
mod fault;
mod parser;

pub use builder::{SoapRequest, build_soap_request};
pub use envelope::{
    BindingStyle, EnvelopeBody, EnvelopeHeader, SOAP11_ENV_NS, SOAP12_ENV_NS, SoapEnvelope,
    SoapHeader, SoapVersion,
};
pub use fault::{SoapFault, build_soap_fault};
pub use parser::{decode_response, parse_soap_envelope};

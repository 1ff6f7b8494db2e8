//! # soapclient - Client SOAP bloquant
//!
//! Client SOAP volontairement minimal utilisé par `soapwrapper` :
//!
//! - construction depuis un WSDL (URL ou fichier) ou en mode non-WSDL
//!   (`location` + `uri`)
//! - appel d'une méthode avec des paramètres [`SoapValue`]
//! - variables typées ([`SoapVar`]) pour forcer l'encodage des types complexes
//! - SOAP 1.1 et 1.2, en-têtes SOAP, faults, trace des échanges
//!
//! ```no_run
//! use soapclient::{ClientOptions, SoapClient, SoapValue};
//!
//! let client = SoapClient::new(
//!     Some("http://currencyconverter.kowabunga.net/converter.asmx?WSDL"),
//!     ClientOptions::default(),
//! )?;
//! let amount = client.call(
//!     "GetConversionAmount",
//!     SoapValue::map([("CurrencyFrom", "USD"), ("CurrencyTo", "EUR"), ("Amount", "100")]),
//! )?;
//! # Ok::<(), soapclient::ClientError>(())
//! ```

pub mod client;
pub mod errors;
pub mod options;
pub mod soap;
pub mod transport;
pub mod value;
pub mod var;
pub mod wsdl;

pub use client::SoapClient;
pub use errors::{ClientError, WsdlError};
pub use options::{ClientOptions, DEFAULT_HTTP_TIMEOUT};
pub use soap::{SoapFault, SoapHeader, SoapVersion};
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use value::{SoapObject, SoapValue, ValueKind};
pub use var::{Encoding, SoapVar};
pub use wsdl::{WsdlDocument, WsdlOperation, WsdlPort};

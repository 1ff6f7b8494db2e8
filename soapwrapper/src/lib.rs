//! # soapwrapper
//!
//! Registre de services SOAP nommés au-dessus de [`soapclient`].
//!
//! Chaque service est déclaré une fois sous un nom unique puis appelé par ce
//! nom. Le [`Wrapper`] construit le client SOAP au moment de l'enregistrement
//! (WSDL récupéré et analysé, ou mode non-WSDL avec `location` et `uri`).
//!
//! ## Exemple
//!
//! ```no_run
//! use soapwrapper::{encode_params, SoapValue, Wrapper};
//!
//! let mut wrapper = Wrapper::new();
//! wrapper.add(|service| {
//!     service
//!         .name("Currency")
//!         .wsdl("http://currencyconverter.kowabunga.net/converter.asmx?WSDL")
//!         .trace(true);
//! })?;
//!
//! let amount = wrapper.call(
//!     "Currency.GetConversionAmount",
//!     SoapValue::map([
//!         ("CurrencyFrom", "USD"),
//!         ("CurrencyTo", "EUR"),
//!         ("RateDate", "2014-06-05"),
//!         ("Amount", "1000"),
//!     ]),
//! )?;
//!
//! // Un objet est enveloppé dans une variable typée portant le nom du paramètre
//! let request = soapwrapper::SoapObject::new().field("Amount", 1000);
//! let _ = wrapper.call("Currency.GetConversionAmount", encode_params(request, "request"));
//! # Ok::<(), soapwrapper::WrapperError>(())
//! ```
//!
//! ## Configuration
//!
//! Avec la feature `soapconfig` (active par défaut), les services peuvent être
//! déclarés dans `config.yaml` et chargés par [`Wrapper::from_config`].

pub mod encoder;
pub mod errors;
pub mod service;
pub mod wrapper;

#[cfg(feature = "soapconfig")]
pub mod config_ext;

pub use encoder::encode_params;
pub use errors::WrapperError;
pub use service::Service;
pub use wrapper::Wrapper;

#[cfg(feature = "soapconfig")]
pub use config_ext::{ServiceConfig, SoapConfigExt};

pub use soapclient::{
    ClientError, ClientOptions, Encoding, HttpResponse, SoapClient, SoapFault, SoapHeader,
    SoapObject, SoapValue, SoapVar, SoapVersion, Transport, ValueKind,
};

//! Extension pour déclarer les services SOAP dans soapconfig
//!
//! Les services sont listés sous la clé `services:` de `config.yaml` :
//!
//! ```yaml
//! defaults:
//!   timeout: 30
//!   soap_version: "1.1"
//!   trace: false
//! services:
//!   - name: Currency
//!     wsdl: http://currencyconverter.kowabunga.net/converter.asmx?WSDL
//!   - name: Legacy
//!     location: http://legacy.example.com/soap
//!     uri: urn:legacy
//!     login: admin
//!     password: encrypted:AAAA...
//! ```
//!
//! Les champs absents prennent les valeurs de `defaults:`.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use soapclient::{ClientOptions, SoapVersion};
use soapconfig::encryption::get_password;
use soapconfig::Config;
use tracing::debug;

use crate::errors::WrapperError;
use crate::wrapper::Wrapper;

/// One entry of the `services:` list
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub wsdl: Option<String>,
    pub location: Option<String>,
    pub uri: Option<String>,
    /// `"1.1"` ou `"1.2"` ; un nombre YAML non quoté est accepté
    #[serde(deserialize_with = "version_string")]
    pub soap_version: Option<String>,
    pub trace: Option<bool>,
    /// Secondes
    pub timeout: Option<u64>,
    pub login: Option<String>,
    /// En clair ou `encrypted:BASE64`
    pub password: Option<String>,
    pub user_agent: Option<String>,
}

/// Trait d'extension pour lire les services SOAP depuis soapconfig
///
/// ```rust,ignore
/// use soapconfig::Config;
/// use soapwrapper::SoapConfigExt;
///
/// let config = Config::load_config("")?;
/// for service in config.get_services()? {
///     println!("{}", service.name);
/// }
/// ```
pub trait SoapConfigExt {
    /// Services déclarés (liste vide si la clé est absente)
    fn get_services(&self) -> Result<Vec<ServiceConfig>>;

    /// Service déclaré sous ce nom
    fn get_service(&self, name: &str) -> Result<Option<ServiceConfig>>;

    /// Options client construites à partir de `defaults:`
    fn get_default_options(&self) -> Result<ClientOptions>;

    /// Options client d'un service, complétées par `defaults:`
    ///
    /// Le mot de passe est déchiffré s'il est stocké sous forme `encrypted:`.
    fn service_options(&self, service: &ServiceConfig) -> Result<ClientOptions>;
}

impl SoapConfigExt for Config {
    fn get_services(&self) -> Result<Vec<ServiceConfig>> {
        match self.get_value(&["services"]) {
            Ok(serde_yaml::Value::Null) | Err(_) => Ok(Vec::new()),
            Ok(_) => self.get_typed(&["services"]),
        }
    }

    fn get_service(&self, name: &str) -> Result<Option<ServiceConfig>> {
        Ok(self
            .get_services()?
            .into_iter()
            .find(|service| service.name == name))
    }

    fn get_default_options(&self) -> Result<ClientOptions> {
        Ok(ClientOptions {
            soap_version: parse_version(&self.get_default_soap_version()?)?,
            trace: self.get_default_trace()?,
            timeout: Duration::from_secs(self.get_default_timeout()?),
            ..Default::default()
        })
    }

    fn service_options(&self, service: &ServiceConfig) -> Result<ClientOptions> {
        let mut options = self.get_default_options()?;

        options.location = service.location.clone();
        options.uri = service.uri.clone();
        if let Some(version) = &service.soap_version {
            options.soap_version = parse_version(version)?;
        }
        if let Some(trace) = service.trace {
            options.trace = trace;
        }
        if let Some(timeout) = service.timeout {
            options.timeout = Duration::from_secs(timeout);
        }
        options.login = service.login.clone();
        options.password = service
            .password
            .as_deref()
            .map(get_password)
            .transpose()
            .map_err(|e| anyhow!("Service {}: {}", service.name, e))?;
        options.user_agent = service.user_agent.clone();

        Ok(options)
    }
}

fn version_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_yaml::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid soap_version: {:?}",
            other
        ))),
    }
}

fn parse_version(version: &str) -> Result<SoapVersion> {
    SoapVersion::parse(version).ok_or_else(|| anyhow!("Unsupported SOAP version: {}", version))
}

impl Wrapper {
    /// Builds a wrapper holding every service listed in `config`
    ///
    /// Services are registered with [`Wrapper::add`], so a name listed twice
    /// fails with [`WrapperError::DuplicateService`].
    pub fn from_config(config: &Config) -> Result<Wrapper, WrapperError> {
        let services = config.get_services().map_err(config_error)?;
        let mut wrapper = Wrapper::new();

        for entry in services {
            let options = config.service_options(&entry).map_err(config_error)?;
            debug!(service = %entry.name, "Registering SOAP service from configuration");

            wrapper.add(|service| {
                service.name(&entry.name).options(options);
                if let Some(wsdl) = &entry.wsdl {
                    service.wsdl(wsdl);
                }
            })?;
        }

        Ok(wrapper)
    }
}

fn config_error(err: anyhow::Error) -> WrapperError {
    WrapperError::Config(err.to_string())
}

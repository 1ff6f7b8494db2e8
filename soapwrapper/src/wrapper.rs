use std::collections::HashMap;

use soapclient::{SoapClient, SoapValue};
use tracing::{debug, info, warn};

use crate::errors::WrapperError;
use crate::service::Service;

/// Registry of named SOAP services
///
/// Names are unique and stored trimmed, lookups trim the requested name the
/// same way. The registry is a plain value owned by the caller; there is no
/// process-wide instance.
///
/// Registered [`Service`]s are only handed out by shared reference so a
/// binding cannot be renamed behind its key; [`Wrapper::client_mut`] gives
/// access to the underlying client.
#[derive(Debug, Default)]
pub struct Wrapper {
    services: HashMap<String, Service>,
}

impl Wrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// All registered services, by name
    pub fn list(&self) -> &HashMap<String, Service> {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name.trim())
    }

    /// Looks a service up and hands it to `callback`
    pub fn get<F>(&self, name: &str, callback: F) -> Result<&Service, WrapperError>
    where
        F: FnOnce(&Service),
    {
        let service = self
            .services
            .get(name.trim())
            .ok_or_else(|| WrapperError::service_not_found(name.trim()))?;
        callback(service);
        Ok(service)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name.trim())
    }

    /// Client of a registered service, e.g. to move its endpoint
    pub fn client_mut(&mut self, name: &str) -> Option<&mut SoapClient> {
        self.services
            .get_mut(name.trim())
            .and_then(Service::client_mut)
    }

    /// Registers a new service
    ///
    /// `builder` receives an empty [`Service`] and must at least set its
    /// name. The SOAP client is only constructed when the name is free; a
    /// taken name fails with [`WrapperError::DuplicateService`] and leaves the
    /// existing registration untouched.
    pub fn add<F>(&mut self, builder: F) -> Result<&mut Self, WrapperError>
    where
        F: FnOnce(&mut Service),
    {
        let mut service = Self::build(builder)?;
        let name = service.get_name().to_string();

        if self.services.contains_key(&name) {
            return Err(WrapperError::duplicate_service(&name));
        }

        service.create_client()?;
        info!(service = %name, "SOAP service registered");
        self.services.insert(name, service);
        Ok(self)
    }

    /// Registers a service, replacing any existing one with the same name
    ///
    /// If the client cannot be constructed the previous registration is kept.
    pub fn override_service<F>(&mut self, builder: F) -> Result<&mut Self, WrapperError>
    where
        F: FnOnce(&mut Service),
    {
        let mut service = Self::build(builder)?;
        let name = service.get_name().to_string();

        service.create_client()?;
        if self.services.insert(name.clone(), service).is_some() {
            warn!(service = %name, "SOAP service overridden");
        } else {
            info!(service = %name, "SOAP service registered");
        }
        Ok(self)
    }

    /// Removes a service; unknown names are ignored
    pub fn remove(&mut self, name: &str) -> &mut Self {
        let name = name.trim();
        if self.services.remove(name).is_some() {
            info!(service = %name, "SOAP service removed");
        } else {
            debug!(service = %name, "No SOAP service to remove");
        }
        self
    }

    /// Calls `"Service.method"`
    ///
    /// ```no_run
    /// # use soapwrapper::{Wrapper, encode_params};
    /// # let wrapper = Wrapper::new();
    /// let amount = wrapper.call("Currency.GetConversionAmount", encode_params(100, "Amount"))?;
    /// # Ok::<(), soapwrapper::WrapperError>(())
    /// ```
    pub fn call(
        &self,
        target: &str,
        params: impl Into<SoapValue>,
    ) -> Result<SoapValue, WrapperError> {
        let (name, method) = target
            .split_once('.')
            .filter(|(name, method)| !name.is_empty() && !method.is_empty())
            .ok_or_else(|| WrapperError::invalid_call(target))?;

        let name = name.trim();
        let service = self
            .services
            .get(name)
            .ok_or_else(|| WrapperError::service_not_found(name))?;
        service.call(method, params)
    }

    fn build<F>(builder: F) -> Result<Service, WrapperError>
    where
        F: FnOnce(&mut Service),
    {
        let mut service = Service::default();
        builder(&mut service);

        if service.get_name().is_empty() {
            return Err(WrapperError::MissingName);
        }
        Ok(service)
    }
}

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use soapclient::{
    ClientError, ClientOptions, SoapClient, SoapHeader, SoapValue, SoapVersion, Transport,
};

use crate::errors::WrapperError;

/// A named SOAP service binding
///
/// A `Service` is filled in by the builder closure given to
/// [`Wrapper::add`](crate::Wrapper::add) or
/// [`Wrapper::override_service`](crate::Wrapper::override_service); the
/// wrapper then constructs its [`SoapClient`].
///
/// ```no_run
/// use soapwrapper::Wrapper;
///
/// let mut wrapper = Wrapper::new();
/// wrapper.add(|service| {
///     service
///         .name("Currency")
///         .wsdl("http://currencyconverter.kowabunga.net/converter.asmx?WSDL")
///         .trace(true);
/// })?;
/// # Ok::<(), soapwrapper::WrapperError>(())
/// ```
#[derive(Default)]
pub struct Service {
    name: String,
    wsdl: Option<String>,
    options: ClientOptions,
    headers: Vec<SoapHeader>,
    transport: Option<Arc<dyn Transport>>,
    client: Option<SoapClient>,
}

impl Service {
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = name.trim().to_string();
        self
    }

    /// WSDL reference: `http(s)://` URL or local file path
    pub fn wsdl(&mut self, wsdl: &str) -> &mut Self {
        self.wsdl = Some(wsdl.to_string());
        self
    }

    /// Endpoint override (required without WSDL)
    pub fn location(&mut self, location: &str) -> &mut Self {
        self.options.location = Some(location.to_string());
        self
    }

    /// Method namespace (required without WSDL)
    pub fn uri(&mut self, uri: &str) -> &mut Self {
        self.options.uri = Some(uri.to_string());
        self
    }

    pub fn soap_version(&mut self, version: SoapVersion) -> &mut Self {
        self.options.soap_version = version;
        self
    }

    pub fn trace(&mut self, trace: bool) -> &mut Self {
        self.options.trace = trace;
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.options.timeout = timeout;
        self
    }

    pub fn login(&mut self, login: &str) -> &mut Self {
        self.options.login = Some(login.to_string());
        self
    }

    pub fn password(&mut self, password: &str) -> &mut Self {
        self.options.password = Some(password.to_string());
        self
    }

    pub fn user_agent(&mut self, user_agent: &str) -> &mut Self {
        self.options.user_agent = Some(user_agent.to_string());
        self
    }

    /// Replaces every client option at once
    pub fn options(&mut self, options: ClientOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Adds a SOAP header sent with every call
    pub fn header(&mut self, header: SoapHeader) -> &mut Self {
        self.headers.push(header);
        self
    }

    pub fn headers(&mut self, headers: Vec<SoapHeader>) -> &mut Self {
        self.headers = headers;
        self
    }

    /// Uses `transport` instead of the default HTTP transport
    pub fn transport(&mut self, transport: Arc<dyn Transport>) -> &mut Self {
        self.transport = Some(transport);
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_wsdl(&self) -> Option<&str> {
        self.wsdl.as_deref()
    }

    pub fn get_options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn get_headers(&self) -> &[SoapHeader] {
        &self.headers
    }

    pub fn client(&self) -> Option<&SoapClient> {
        self.client.as_ref()
    }

    pub fn client_mut(&mut self) -> Option<&mut SoapClient> {
        self.client.as_mut()
    }

    /// Constructs the underlying client from the current configuration
    ///
    /// In WSDL mode this fetches and parses the document.
    pub(crate) fn create_client(&mut self) -> Result<(), ClientError> {
        let wsdl = self.wsdl.as_deref();
        let options = self.options.clone();

        let client = match &self.transport {
            Some(transport) => SoapClient::with_transport(wsdl, options, Arc::clone(transport))?,
            None => SoapClient::new(wsdl, options)?,
        };

        self.client = Some(client);
        Ok(())
    }

    fn require_client(&self) -> Result<&SoapClient, WrapperError> {
        self.client
            .as_ref()
            .ok_or_else(|| WrapperError::ClientNotCreated(self.name.clone()))
    }

    /// Calls `method` with the service headers
    pub fn call(
        &self,
        method: &str,
        params: impl Into<SoapValue>,
    ) -> Result<SoapValue, WrapperError> {
        let client = self.require_client()?;
        Ok(client.call_with_headers(method, params, &self.headers)?)
    }

    /// Operations declared by the WSDL
    pub fn functions(&self) -> Vec<String> {
        self.client
            .as_ref()
            .map(SoapClient::functions)
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<String> {
        self.client.as_ref().and_then(SoapClient::last_request)
    }

    pub fn last_response(&self) -> Option<String> {
        self.client.as_ref().and_then(SoapClient::last_response)
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field("wsdl", &self.wsdl)
            .field("options", &self.options)
            .field("headers", &self.headers)
            .field("custom_transport", &self.transport.is_some())
            .field("client", &self.client)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let mut service = Service::default();
        service
            .name("  Currency ")
            .wsdl("http://example.com/currency.asmx?WSDL")
            .soap_version(SoapVersion::V1_2)
            .trace(true)
            .timeout(Duration::from_secs(5))
            .login("alice")
            .password("secret")
            .header(SoapHeader::new("urn:auth", "Token", "abc"));

        assert_eq!(service.get_name(), "Currency");
        assert_eq!(service.get_wsdl(), Some("http://example.com/currency.asmx?WSDL"));
        assert_eq!(service.get_options().soap_version, SoapVersion::V1_2);
        assert!(service.get_options().trace);
        assert_eq!(service.get_options().timeout, Duration::from_secs(5));
        assert_eq!(service.get_options().login.as_deref(), Some("alice"));
        assert_eq!(service.get_headers().len(), 1);
        assert!(service.client().is_none());
    }

    #[test]
    fn test_call_without_client() {
        let mut service = Service::default();
        service.name("Detached");

        let err = service.call("Ping", SoapValue::Null).unwrap_err();
        assert!(matches!(err, WrapperError::ClientNotCreated(name) if name == "Detached"));
        assert!(service.functions().is_empty());
        assert!(service.last_request().is_none());
    }
}

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::errors::{ClientError, WsdlError};
use crate::options::ClientOptions;
use crate::soap::{
    BindingStyle, SoapHeader, SoapRequest, SoapVersion, build_soap_request, decode_response,
    parse_soap_envelope,
};
use crate::transport::{HttpTransport, Transport};
use crate::value::SoapValue;
use crate::wsdl::WsdlDocument;

#[derive(Debug, Default)]
struct Trace {
    last_request: Option<String>,
    last_response: Option<String>,
}

/// Client SOAP lié à un endpoint
///
/// En mode WSDL, l'endpoint, le namespace et la liste des opérations sont
/// lus dans le document (les options `location` et `uri` restent
/// prioritaires). Sans WSDL, `location` et `uri` sont obligatoires.
pub struct SoapClient {
    wsdl: Option<WsdlDocument>,
    options: ClientOptions,
    location: String,
    namespace: String,
    transport: Arc<dyn Transport>,
    trace: Mutex<Trace>,
}

impl SoapClient {
    /// Construit un client avec le transport HTTP par défaut
    pub fn new(wsdl: Option<&str>, options: ClientOptions) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(options.timeout));
        Self::with_transport(wsdl, options, transport)
    }

    pub fn with_transport(
        wsdl: Option<&str>,
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let wsdl = match wsdl.map(str::trim).filter(|w| !w.is_empty()) {
            Some(source) => Some(WsdlDocument::load(source, transport.as_ref())?),
            None => {
                if options.location.is_none() || options.uri.is_none() {
                    return Err(ClientError::invalid_options(
                        "'location' and 'uri' options are required in non-WSDL mode",
                    ));
                }
                None
            }
        };

        let location = match &options.location {
            Some(location) => location.clone(),
            None => wsdl
                .as_ref()
                .and_then(|doc| doc.endpoint(options.soap_version))
                .map(|port| port.location.clone())
                .ok_or(WsdlError::MissingAddress)?,
        };

        let namespace = options
            .uri
            .clone()
            .or_else(|| wsdl.as_ref().and_then(|doc| doc.target_namespace.clone()))
            .ok_or_else(|| {
                ClientError::invalid_options("no 'uri' option and no WSDL targetNamespace")
            })?;

        info!(
            location = %location,
            namespace = %namespace,
            wsdl = wsdl.is_some(),
            "SOAP client created"
        );

        Ok(Self {
            wsdl,
            options,
            location,
            namespace,
            transport,
            trace: Mutex::new(Trace::default()),
        })
    }

    /// Appelle une méthode du service
    pub fn call(
        &self,
        method: &str,
        params: impl Into<SoapValue>,
    ) -> Result<SoapValue, ClientError> {
        self.call_with_headers(method, params, &[])
    }

    /// Appelle une méthode en ajoutant des en-têtes SOAP à l'enveloppe
    pub fn call_with_headers(
        &self,
        method: &str,
        params: impl Into<SoapValue>,
        headers: &[SoapHeader],
    ) -> Result<SoapValue, ClientError> {
        if let Some(wsdl) = &self.wsdl {
            if !wsdl.has_operation(method) {
                return Err(ClientError::UnknownOperation(method.to_string()));
            }
        }

        let params = params.into();
        let body = build_soap_request(&SoapRequest {
            version: self.options.soap_version,
            style: self.style(),
            namespace: &self.namespace,
            method,
            params: &params,
            headers,
        })?;

        let http_headers = self.http_headers(&self.soap_action(method));

        if self.options.trace {
            self.trace.lock().last_request = Some(body.clone());
        }

        debug!(location = %self.location, method, "Calling SOAP method");
        let response = self.transport.post(&self.location, &http_headers, body)?;

        if self.options.trace {
            self.trace.lock().last_response = Some(response.body.clone());
        }

        let envelope = match parse_soap_envelope(response.body.as_bytes()) {
            Ok(envelope) => envelope,
            Err(_) if !response.is_success() => {
                return Err(ClientError::HttpStatus {
                    status: response.status,
                    body: response.body,
                });
            }
            Err(err) => return Err(err),
        };

        match decode_response(&envelope) {
            Err(ClientError::Fault(fault)) => {
                warn!(method, code = %fault.code, message = %fault.message, "SOAP fault");
                Err(ClientError::Fault(fault))
            }
            Err(err) => Err(err),
            Ok(_) if !response.is_success() => Err(ClientError::HttpStatus {
                status: response.status,
                body: response.body,
            }),
            Ok(value) => Ok(value),
        }
    }

    /// Noms des opérations déclarées par le WSDL
    pub fn functions(&self) -> Vec<String> {
        self.wsdl
            .as_ref()
            .map(WsdlDocument::operation_names)
            .unwrap_or_default()
    }

    /// Change l'endpoint utilisé par les appels suivants
    pub fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn wsdl(&self) -> Option<&WsdlDocument> {
        self.wsdl.as_ref()
    }

    /// Dernière enveloppe envoyée (si `trace` est activé)
    pub fn last_request(&self) -> Option<String> {
        self.trace.lock().last_request.clone()
    }

    /// Dernière réponse reçue (si `trace` est activé)
    pub fn last_response(&self) -> Option<String> {
        self.trace.lock().last_response.clone()
    }

    fn style(&self) -> BindingStyle {
        self.wsdl
            .as_ref()
            .map(|doc| doc.style)
            .unwrap_or_default()
    }

    fn soap_action(&self, method: &str) -> String {
        self.wsdl
            .as_ref()
            .and_then(|doc| doc.operation(method))
            .and_then(|op| op.soap_action.clone())
            .unwrap_or_else(|| format!("{}#{}", self.namespace, method))
    }

    fn http_headers(&self, action: &str) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        match self.options.soap_version {
            SoapVersion::V1_1 => {
                headers.push((
                    "Content-Type".to_string(),
                    "text/xml; charset=utf-8".to_string(),
                ));
                headers.push(("SOAPAction".to_string(), format!("\"{}\"", action)));
            }
            SoapVersion::V1_2 => {
                headers.push((
                    "Content-Type".to_string(),
                    format!("application/soap+xml; charset=utf-8; action=\"{}\"", action),
                ));
            }
        }

        if let Some(login) = &self.options.login {
            let password = self.options.password.as_deref().unwrap_or_default();
            let credentials = base64::engine::general_purpose::STANDARD
                .encode(format!("{}:{}", login, password));
            headers.push(("Authorization".to_string(), format!("Basic {}", credentials)));
        }

        if let Some(user_agent) = &self.options.user_agent {
            headers.push(("User-Agent".to_string(), user_agent.clone()));
        }

        headers
    }
}

impl fmt::Debug for SoapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoapClient")
            .field("location", &self.location)
            .field("namespace", &self.namespace)
            .field("functions", &self.functions())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::build_soap_fault;
    use crate::transport::HttpResponse;

    /// Transport en mémoire : renvoie toujours la même réponse et garde
    /// les requêtes reçues
    struct StaticTransport {
        wsdl: String,
        response: HttpResponse,
        sent: Mutex<Vec<(String, Vec<(String, String)>, String)>>,
    }

    impl StaticTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                wsdl: String::new(),
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for StaticTransport {
        fn get(&self, _url: &str) -> Result<String, ClientError> {
            Ok(self.wsdl.clone())
        }

        fn post(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: String,
        ) -> Result<HttpResponse, ClientError> {
            self.sent
                .lock()
                .push((url.to_string(), headers.to_vec(), body));
            Ok(self.response.clone())
        }
    }

    const PING_RESPONSE: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body><ns1:PingResponse xmlns:ns1="urn:ping"><return>pong</return></ns1:PingResponse></s:Body>
</s:Envelope>"#;

    fn non_wsdl_options() -> ClientOptions {
        ClientOptions {
            location: Some("http://localhost/ping".to_string()),
            uri: Some("urn:ping".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_non_wsdl_mode_requires_location_and_uri() {
        let transport = StaticTransport::new(200, PING_RESPONSE);
        let options = ClientOptions {
            location: Some("http://localhost/ping".to_string()),
            ..Default::default()
        };
        let err = SoapClient::with_transport(None, options, transport).unwrap_err();
        assert!(matches!(err, ClientError::InvalidOptions(_)));
    }

    #[test]
    fn test_call_non_wsdl() {
        let transport = StaticTransport::new(200, PING_RESPONSE);
        let mut options = non_wsdl_options();
        options.trace = true;
        options.login = Some("alice".to_string());
        options.password = Some("secret".to_string());
        options.user_agent = Some("soapwrapper-tests".to_string());

        let client = SoapClient::with_transport(None, options, transport.clone()).unwrap();
        let value = client
            .call("Ping", SoapValue::map([("message", "ping")]))
            .unwrap();
        assert_eq!(value, SoapValue::String("pong".to_string()));
        assert!(client.functions().is_empty());

        let sent = transport.sent.lock();
        let (url, headers, body) = &sent[0];
        assert_eq!(url, "http://localhost/ping");
        assert!(body.contains("<message>ping</message>"));
        assert!(headers.contains(&("SOAPAction".to_string(), "\"urn:ping#Ping\"".to_string())));
        assert!(headers.contains(&(
            "Authorization".to_string(),
            "Basic YWxpY2U6c2VjcmV0".to_string()
        )));
        assert!(headers.contains(&("User-Agent".to_string(), "soapwrapper-tests".to_string())));

        assert_eq!(client.last_request().as_deref(), Some(body.as_str()));
        assert_eq!(client.last_response().as_deref(), Some(PING_RESPONSE));
    }

    #[test]
    fn test_soap12_content_type() {
        let transport = StaticTransport::new(200, PING_RESPONSE);
        let mut options = non_wsdl_options();
        options.soap_version = SoapVersion::V1_2;

        let client = SoapClient::with_transport(None, options, transport.clone()).unwrap();
        client.call("Ping", SoapValue::Null).unwrap();

        let sent = transport.sent.lock();
        let (_, headers, _) = &sent[0];
        assert!(headers.contains(&(
            "Content-Type".to_string(),
            "application/soap+xml; charset=utf-8; action=\"urn:ping#Ping\"".to_string()
        )));
        assert!(!headers.iter().any(|(name, _)| name == "SOAPAction"));
    }

    #[test]
    fn test_trace_disabled_by_default() {
        let transport = StaticTransport::new(200, PING_RESPONSE);
        let client = SoapClient::with_transport(None, non_wsdl_options(), transport).unwrap();
        client.call("Ping", SoapValue::Null).unwrap();
        assert!(client.last_request().is_none());
        assert!(client.last_response().is_none());
    }

    #[test]
    fn test_fault_over_http_500() {
        let fault = build_soap_fault(SoapVersion::V1_1, "SOAP-ENV:Server", "Service down", None)
            .unwrap();
        let transport = StaticTransport::new(500, &fault);
        let client = SoapClient::with_transport(None, non_wsdl_options(), transport).unwrap();

        let err = client.call("Ping", SoapValue::Null).unwrap_err();
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.code, "SOAP-ENV:Server");
        assert_eq!(fault.message, "Service down");
    }

    #[test]
    fn test_http_error_without_envelope() {
        let transport = StaticTransport::new(503, "Service Unavailable");
        let client = SoapClient::with_transport(None, non_wsdl_options(), transport).unwrap();

        let err = client.call("Ping", SoapValue::Null).unwrap_err();
        assert!(matches!(err, ClientError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_set_location() {
        let transport = StaticTransport::new(200, PING_RESPONSE);
        let mut client =
            SoapClient::with_transport(None, non_wsdl_options(), transport.clone()).unwrap();
        client.set_location("http://backup/ping");
        client.call("Ping", SoapValue::Null).unwrap();
        assert_eq!(client.location(), "http://backup/ping");
        assert_eq!(transport.sent.lock()[0].0, "http://backup/ping");
    }
}

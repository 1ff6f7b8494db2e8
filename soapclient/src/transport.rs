use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::errors::ClientError;

/// Réponse HTTP brute d'un appel SOAP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Couche HTTP utilisée par [`SoapClient`](crate::SoapClient)
///
/// L'implémentation par défaut est [`HttpTransport`] ; les tests peuvent
/// fournir leur propre transport en mémoire.
pub trait Transport: Send + Sync {
    /// Récupère un document (le WSDL)
    fn get(&self, url: &str) -> Result<String, ClientError>;

    /// Envoie une enveloppe SOAP
    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<HttpResponse, ClientError>;
}

/// Transport HTTP bloquant basé sur `ureq`
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        // Les statuts 4xx/5xx ne sont pas des erreurs : un fault SOAP arrive
        // avec un HTTP 500 et son corps doit rester lisible.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, ClientError> {
        let mut response = self.agent.get(url).call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if !(200..300).contains(&status) {
            return Err(ClientError::HttpStatus { status, body });
        }
        Ok(body)
    }

    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: String,
    ) -> Result<HttpResponse, ClientError> {
        debug!(url = %url, bytes = body.len(), "Sending SOAP request");

        let mut request = self.agent.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let mut response = request.send(body)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        debug!(url = %url, status, "Received SOAP response");
        Ok(HttpResponse { status, body })
    }
}

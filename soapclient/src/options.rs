use std::fmt;
use std::time::Duration;

use crate::soap::SoapVersion;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Options de construction d'un [`SoapClient`](crate::SoapClient)
#[derive(Clone, PartialEq)]
pub struct ClientOptions {
    /// Endpoint du service ; remplace l'adresse déclarée par le WSDL
    pub location: Option<String>,

    /// Namespace des méthodes ; remplace le targetNamespace du WSDL
    pub uri: Option<String>,

    pub soap_version: SoapVersion,

    /// Conserve la dernière requête et la dernière réponse
    pub trace: bool,

    pub timeout: Duration,

    /// Authentification HTTP basique
    pub login: Option<String>,
    pub password: Option<String>,

    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            location: None,
            uri: None,
            soap_version: SoapVersion::default(),
            trace: false,
            timeout: DEFAULT_HTTP_TIMEOUT,
            login: None,
            password: None,
            user_agent: None,
        }
    }
}

// Le mot de passe n'apparaît jamais dans les logs
impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("location", &self.location)
            .field("uri", &self.uri)
            .field("soap_version", &self.soap_version)
            .field("trace", &self.trace)
            .field("timeout", &self.timeout)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

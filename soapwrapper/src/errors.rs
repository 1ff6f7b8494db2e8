use soapclient::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("Service \"{0}\" already exists, use override_service to replace it")]
    DuplicateService(String),
    #[error("Service \"{0}\" is not found")]
    ServiceNotFound(String),
    #[error("Service has no name, set one in the builder")]
    MissingName,
    #[error("Service \"{0}\" has no SOAP client, it was not registered through a Wrapper")]
    ClientNotCreated(String),
    #[error("Invalid call target \"{0}\", expected \"Service.method\"")]
    InvalidCall(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl WrapperError {
    pub fn duplicate_service(name: &str) -> Self {
        WrapperError::DuplicateService(name.to_string())
    }

    pub fn service_not_found(name: &str) -> Self {
        WrapperError::ServiceNotFound(name.to_string())
    }

    pub fn invalid_call(target: &str) -> Self {
        WrapperError::InvalidCall(target.to_string())
    }
}

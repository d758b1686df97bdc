//! Client HTTP bloquant partagé et classification des échecs de transport

use reqwest::blocking::{Client, RequestBuilder};
use tracing::{debug, warn};

use kadaster::{ResolveError, Service, TransportFailure};

use crate::config::ServiceConfig;

/// Construit le client HTTP d'un collaborateur (user agent et timeout de la configuration)
pub fn build_client(config: &ServiceConfig, service: Service) -> Result<Client, ResolveError> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()
        .map_err(|e| build_failure(service, e))
}

fn build_failure(service: Service, reason: impl std::fmt::Display) -> ResolveError {
    warn!(service = %service, error = %reason, "Failed to build HTTP client");
    ResolveError::unavailable(
        service,
        TransportFailure::Connection(format!("failed to build HTTP client: {}", reason)),
    )
}

/// Classe une erreur reqwest en échec de transport
pub fn transport_failure(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if let Some(status) = err.status() {
        TransportFailure::Status(status.as_u16())
    } else {
        TransportFailure::Connection(err.to_string())
    }
}

/// Envoie la requête et renvoie le corps si le statut est 2xx
pub fn send(service: Service, request: RequestBuilder) -> Result<String, ResolveError> {
    let response = request.send().map_err(|e| {
        warn!(service = %service, error = %e, "Request failed");
        ResolveError::unavailable(service, transport_failure(&e))
    })?;

    let status = response.status();
    debug!(service = %service, status = status.as_u16(), url = %response.url(), "Response received");

    if !status.is_success() {
        warn!(service = %service, status = status.as_u16(), "Unexpected HTTP status");
        return Err(ResolveError::unavailable(
            service,
            TransportFailure::Status(status.as_u16()),
        ));
    }

    response
        .text()
        .map_err(|e| ResolveError::unavailable(service, transport_failure(&e)))
}

//! Types d'erreurs pour le crate kadaster

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Collaborateur externe appelé par le résolveur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    /// Géocodeur (PDOK Locatieserver)
    Geocoder,
    /// Service WFS des parcelles
    FeatureService,
    /// Endpoint de score biodiversité
    Scoring,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Geocoder => write!(f, "geocoder"),
            Service::FeatureService => write!(f, "feature service"),
            Service::Scoring => write!(f, "scoring service"),
        }
    }
}

/// Échec au niveau transport d'un appel sortant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Délai dépassé (pas de retry)
    Timeout,
    /// Statut HTTP non 2xx
    Status(u16),
    /// Connexion impossible, DNS, TLS...
    Connection(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "request timed out"),
            TransportFailure::Status(code) => write!(f, "HTTP status {}", code),
            TransportFailure::Connection(reason) => write!(f, "connection error: {}", reason),
        }
    }
}

/// Erreur levée par l'utilitaire de transformation de coordonnées
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Couple EPSG non supporté
    #[error("Unsupported reprojection EPSG:{from} -> EPSG:{to}")]
    Unsupported { from: u32, to: u32 },

    /// Coordonnée hors domaine ou calcul non convergent
    #[error("Coordinate ({x}, {y}) could not be transformed: {reason}")]
    Failed { x: f64, y: f64, reason: String },
}

/// Erreurs de résolution adresse → parcelle
///
/// Toutes récupérables : chaque échec est détecté là où il survient et
/// remonte immédiatement, jamais de `ResolvedParcel` partiel.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Adresse vide, rayon invalide...
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Le géocodeur n'a renvoyé aucun document
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Centroïde absent ou illisible
    #[error("Malformed geocoder response: {0}")]
    MalformedGeocodeResponse(String),

    /// Aucune parcelle dans la fenêtre de recherche
    #[error("No parcel found within {radius} m of ({x:.2}, {y:.2})")]
    NoParcelFound { x: f64, y: f64, radius: f64 },

    /// Appel sortant en échec (statut, timeout, connexion)
    #[error("{service} unavailable: {failure}")]
    CollaboratorUnavailable {
        service: Service,
        failure: TransportFailure,
    },

    /// Réponse WFS non interprétable comme FeatureCollection
    #[error("Malformed feature response: {0}")]
    MalformedFeatureResponse(String),

    /// Échec de la reprojection
    #[error("Reprojection failed: {0}")]
    Reprojection(#[from] TransformError),
}

/// Nature d'une erreur, stable pour la couche de présentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    AddressNotFound,
    MalformedGeocodeResponse,
    NoParcelFound,
    CollaboratorUnavailable,
    MalformedFeatureResponse,
    Reprojection,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::AddressNotFound => "address_not_found",
            ErrorKind::MalformedGeocodeResponse => "malformed_geocode_response",
            ErrorKind::NoParcelFound => "no_parcel_found",
            ErrorKind::CollaboratorUnavailable => "collaborator_unavailable",
            ErrorKind::MalformedFeatureResponse => "malformed_feature_response",
            ErrorKind::Reprojection => "reprojection",
        }
    }
}

impl ResolveError {
    /// Crée une erreur de transport pour un collaborateur
    pub fn unavailable(service: Service, failure: TransportFailure) -> Self {
        Self::CollaboratorUnavailable { service, failure }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::AddressNotFound(_) => ErrorKind::AddressNotFound,
            Self::MalformedGeocodeResponse(_) => ErrorKind::MalformedGeocodeResponse,
            Self::NoParcelFound { .. } => ErrorKind::NoParcelFound,
            Self::CollaboratorUnavailable { .. } => ErrorKind::CollaboratorUnavailable,
            Self::MalformedFeatureResponse(_) => ErrorKind::MalformedFeatureResponse,
            Self::Reprojection(_) => ErrorKind::Reprojection,
        }
    }

    /// Vrai si l'appel sortant a dépassé son délai
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::CollaboratorUnavailable {
                failure: TransportFailure::Timeout,
                ..
            }
        )
    }

    /// Code HTTP équivalent pour la couche de présentation
    ///
    /// Erreurs client (4xx) : entrée invalide, adresse ou parcelle introuvable.
    /// Erreurs serveur (5xx) : collaborateurs indisponibles ou réponses illisibles.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::AddressNotFound(_) | Self::NoParcelFound { .. } => 404,
            Self::CollaboratorUnavailable {
                failure: TransportFailure::Timeout,
                ..
            } => 504,
            Self::MalformedGeocodeResponse(_)
            | Self::CollaboratorUnavailable { .. }
            | Self::MalformedFeatureResponse(_) => 502,
            Self::Reprojection(_) => 500,
        }
    }

    /// Message destiné à l'utilisateur final (sans détail interne)
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "Please provide a non-empty address",
            Self::AddressNotFound(_) => "Address not found",
            Self::NoParcelFound { .. } => "No parcels found for this address",
            Self::CollaboratorUnavailable {
                failure: TransportFailure::Timeout,
                ..
            } => "An external service did not answer in time",
            Self::CollaboratorUnavailable { .. } => "An external service is unavailable",
            Self::MalformedGeocodeResponse(_) | Self::MalformedFeatureResponse(_) => {
                "Error processing the external service response"
            }
            Self::Reprojection(_) => "Error transforming parcel coordinates",
        }
    }
}

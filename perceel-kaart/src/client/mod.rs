//! Clients HTTP des collaborateurs externes
//!
//! - `locatieserver` : géocodage PDOK (free search)
//! - `wfs` : parcelles `kadastralekaart:perceel` en GeoJSON
//! - `biodiversity` : score optionnel, non bloquant

pub mod biodiversity;
pub mod http;
pub mod locatieserver;
pub mod wfs;

pub use biodiversity::{BiodiversityClient, BiodiversityOutcome};
pub use http::build_client;
pub use locatieserver::LocatieserverClient;
pub use wfs::WfsClient;

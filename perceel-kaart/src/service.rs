//! Résolution complète : clients HTTP + résolveur + score optionnel

use tracing::{debug, warn};

use kadaster::{ResolveError, ResolveOptions, ResolvedParcel, Resolver, Service};

use crate::client::{
    build_client, BiodiversityClient, BiodiversityOutcome, LocatieserverClient, WfsClient,
};
use crate::config::ServiceConfig;
use crate::reproject_lite::Reprojection;

/// Parcelle résolue et score éventuel
#[derive(Debug, Clone)]
pub struct Resolution {
    pub parcel: ResolvedParcel,
    pub biodiversity: Option<BiodiversityOutcome>,
}

/// Résout une adresse avec des clients créés pour cet appel
///
/// Bloquant : à appeler hors du runtime async (`spawn_blocking`).
/// Le score n'est demandé que si `score` est vrai et qu'une URL est configurée.
pub fn resolve_address(
    config: &ServiceConfig,
    address: &str,
    options: &ResolveOptions,
    score: bool,
) -> Result<Resolution, ResolveError> {
    let geocoder = LocatieserverClient::new(
        build_client(config, Service::Geocoder)?,
        config.geocoder_url.as_str(),
    );
    let wfs = WfsClient::new(
        build_client(config, Service::FeatureService)?,
        config.wfs_url.as_str(),
        config.wfs_version.as_str(),
        config.wfs_type_name.as_str(),
    );
    let resolver = Resolver::new(geocoder, wfs, Reprojection);

    let parcel = resolver.resolve(address, options)?;

    let biodiversity = match (score, config.biodiversity_url.as_deref()) {
        (true, Some(url)) => Some(match build_client(config, Service::Scoring) {
            Ok(client) => BiodiversityClient::new(client, url).score(&parcel.candidate),
            Err(e) => {
                warn!(error = %e, "Biodiversity scoring skipped");
                BiodiversityOutcome::Failed {
                    error: "Failed to fetch biodiversity data".to_string(),
                }
            }
        }),
        (true, None) => {
            debug!("Biodiversity scoring requested but no URL configured");
            None
        }
        (false, _) => None,
    };

    Ok(Resolution {
        parcel,
        biodiversity,
    })
}

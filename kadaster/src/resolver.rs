//! Résolution adresse → parcelle cadastrale

use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::parser::locatie::LocationDocument;
use crate::parser::parcel_id::LinkedParcelId;
use crate::select::select_candidate;
use crate::transform::CoordinateTransform;
use crate::types::{epsg, BoundingBox, GeocodeResult, ParcelCandidate, ResolvedParcel};

/// Rayon de recherche par défaut (m)
pub const DEFAULT_SEARCH_RADIUS: f64 = 50.0;

/// Géocodeur : adresse libre → documents de localisation classés
pub trait Geocoder {
    fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<LocationDocument>, ResolveError>;
}

/// Service de features : parcelles intersectant une fenêtre
pub trait ParcelSource {
    fn parcels_in(
        &self,
        bbox: &BoundingBox,
        epsg: u32,
    ) -> Result<Vec<ParcelCandidate>, ResolveError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<LocationDocument>, ResolveError> {
        (**self).search(query, max_results)
    }
}

impl<T: ParcelSource + ?Sized> ParcelSource for &T {
    fn parcels_in(
        &self,
        bbox: &BoundingBox,
        epsg: u32,
    ) -> Result<Vec<ParcelCandidate>, ResolveError> {
        (**self).parcels_in(bbox, epsg)
    }
}

/// Paramètres d'une résolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveOptions {
    /// EPSG du système de sortie
    pub target_epsg: u32,
    /// Demi-côté de la fenêtre de recherche (m)
    pub search_radius: f64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            target_epsg: epsg::WGS84,
            search_radius: DEFAULT_SEARCH_RADIUS,
        }
    }
}

impl ResolveOptions {
    pub fn validate(&self) -> Result<(), ResolveError> {
        if !self.search_radius.is_finite() || self.search_radius <= 0.0 {
            return Err(ResolveError::InvalidInput(format!(
                "search radius must be > 0, got {}",
                self.search_radius
            )));
        }
        Ok(())
    }
}

/// Résolveur sans état : deux appels sortants séquentiels par adresse
///
/// Chaque appel à [`Resolver::resolve`] est indépendant. Le résolveur peut
/// être partagé entre threads si ses collaborateurs le permettent.
pub struct Resolver<G, P, T> {
    geocoder: G,
    parcels: P,
    transform: T,
    native_epsg: u32,
}

impl<G, P, T> Resolver<G, P, T>
where
    G: Geocoder,
    P: ParcelSource,
    T: CoordinateTransform,
{
    pub fn new(geocoder: G, parcels: P, transform: T) -> Self {
        Self {
            geocoder,
            parcels,
            transform,
            native_epsg: epsg::RD_NEW,
        }
    }

    /// Système projeté natif des deux collaborateurs
    pub fn native_epsg(&self) -> u32 {
        self.native_epsg
    }

    /// Résout une adresse en parcelle reprojetée dans `options.target_epsg`
    pub fn resolve(
        &self,
        address: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedParcel, ResolveError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(ResolveError::InvalidInput(
                "address is empty".to_string(),
            ));
        }
        options.validate()?;

        // 1. Géocodage, premier document uniquement
        let docs = self.geocoder.search(query, 1)?;
        let Some(doc) = docs.first() else {
            return Err(ResolveError::AddressNotFound(query.to_string()));
        };

        // 2. Point natif
        let geocode = GeocodeResult::from_document(doc)?;
        let point = geocode.point_native;
        debug!(
            x = point.x,
            y = point.y,
            linked = ?geocode.linked_parcel_id,
            "Geocoded address"
        );

        // 3-4. Fenêtre et parcelles candidates
        let bbox = BoundingBox::around(point, options.search_radius);
        let candidates = self.parcels.parcels_in(&bbox, self.native_epsg)?;
        if candidates.is_empty() {
            return Err(ResolveError::NoParcelFound {
                x: point.x,
                y: point.y,
                radius: options.search_radius,
            });
        }

        // 5. Désambiguïsation
        let linked = geocode.linked_parcel_id.as_deref().and_then(|raw| {
            raw.parse::<LinkedParcelId>()
                .map_err(|e| warn!(linked = raw, error = %e, "Ignoring malformed linked parcel id"))
                .ok()
        });

        let Some((index, selection)) = select_candidate(&candidates, point, linked.as_ref())
        else {
            return Err(ResolveError::NoParcelFound {
                x: point.x,
                y: point.y,
                radius: options.search_radius,
            });
        };

        // 6. Reprojection de la parcelle et du point
        let candidate_count = candidates.len();
        let candidate = candidates.into_iter().nth(index).ok_or_else(|| {
            ResolveError::MalformedFeatureResponse(format!("candidate {} vanished", index))
        })?;

        let geometry = self.transform.transform_geometry(
            &candidate.geometry,
            self.native_epsg,
            options.target_epsg,
        )?;
        let location = if self.native_epsg == options.target_epsg {
            point
        } else {
            self.transform
                .transform(point, self.native_epsg, options.target_epsg)?
        };

        info!(
            address = query,
            candidates = candidate_count,
            selection = ?selection,
            target_epsg = options.target_epsg,
            "Parcel resolved"
        );

        Ok(ResolvedParcel {
            source_address: address.to_string(),
            geometry,
            location,
            target_epsg: options.target_epsg,
            candidate,
            geocode,
            selection,
            candidate_count,
        })
    }
}

//! Parser pour les FeatureCollection GeoJSON du WFS kadastrale kaart

use geojson::{feature::Id, GeoJson};

use crate::error::ResolveError;
use crate::geometry::ParcelGeometry;
use crate::types::ParcelCandidate;

/// Parse une réponse GetFeature en candidats, dans l'ordre du document
///
/// Les features sans géométrie ou non surfaciques sont ignorées. Une
/// collection non vide dont aucune feature n'est exploitable est une erreur.
pub fn parse_feature_collection(body: &str) -> Result<Vec<ParcelCandidate>, ResolveError> {
    let geojson = body
        .parse::<GeoJson>()
        .map_err(|e| ResolveError::MalformedFeatureResponse(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(ResolveError::MalformedFeatureResponse(
            "expected a FeatureCollection".to_string(),
        ));
    };

    let total = collection.features.len();
    let mut candidates = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            tracing::debug!(index, "Skipping feature without geometry");
            skipped += 1;
            continue;
        };

        let geometry = match ParcelGeometry::from_geojson(&geometry.value) {
            Ok(g) => g,
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping unusable parcel feature");
                skipped += 1;
                continue;
            }
        };

        let id = feature.id.map(|id| match id {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        });

        candidates.push(ParcelCandidate {
            id,
            geometry,
            properties: feature.properties.unwrap_or_default(),
        });
    }

    if total > 0 && candidates.is_empty() {
        return Err(ResolveError::MalformedFeatureResponse(format!(
            "none of the {} features has a usable polygon geometry",
            total
        )));
    }

    tracing::debug!(candidates = candidates.len(), skipped, "Parsed WFS features");
    Ok(candidates)
}

//! Parser pour les réponses du PDOK Locatieserver (free search)

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::parser::point;
use crate::types::GeocodeResult;

/// Enveloppe `{ "response": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    pub response: LocationResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationResults {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,

    #[serde(default)]
    pub docs: Vec<LocationDocument>,
}

/// Document de localisation, seuls les champs utilisés sont typés
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDocument {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,

    #[serde(default)]
    pub weergavenaam: Option<String>,

    /// Centroïde RD New, ex: `POINT(121395 487350)`
    #[serde(default)]
    pub centroide_rd: Option<String>,

    /// Centroïde WGS84, ex: `POINT(4.89373 52.37302)`
    #[serde(default)]
    pub centroide_ll: Option<String>,

    #[serde(default)]
    pub gekoppeld_perceel: Option<OneOrMany>,
}

/// `gekoppeld_perceel` peut être une liste ou une chaîne seule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(s) => Some(s.as_str()),
            OneOrMany::Many(v) => v.first().map(String::as_str),
        }
    }
}

/// Parse le corps JSON d'une réponse free search
pub fn parse_response(body: &str) -> Result<Vec<LocationDocument>, ResolveError> {
    let parsed: LocationResponse = serde_json::from_str(body)
        .map_err(|e| ResolveError::MalformedGeocodeResponse(format!("invalid JSON: {}", e)))?;

    tracing::debug!(
        num_found = parsed.response.num_found,
        docs = parsed.response.docs.len(),
        "Locatieserver response"
    );

    Ok(parsed.response.docs)
}

impl GeocodeResult {
    /// Construit le résultat de géocodage depuis un document
    ///
    /// Le centroïde RD est obligatoire. Le centroïde WGS84 est optionnel et
    /// ignoré s'il est illisible.
    pub fn from_document(doc: &LocationDocument) -> Result<Self, ResolveError> {
        let raw = doc.centroide_rd.as_deref().ok_or_else(|| {
            ResolveError::MalformedGeocodeResponse("missing centroide_rd".to_string())
        })?;
        let point_native =
            point::parse(raw).map_err(ResolveError::MalformedGeocodeResponse)?;

        let point_geographic = doc
            .centroide_ll
            .as_deref()
            .and_then(|raw| match point::parse(raw) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unparseable centroide_ll");
                    None
                }
            });

        let linked_parcel_id = doc
            .gekoppeld_perceel
            .as_ref()
            .and_then(OneOrMany::first)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            point_native,
            point_geographic,
            linked_parcel_id,
            display_name: doc.weergavenaam.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    const DAM_RESPONSE: &str = r#"{
        "response": {
            "numFound": 1,
            "start": 0,
            "maxScore": 17.5,
            "docs": [{
                "type": "adres",
                "weergavenaam": "Dam 1, 1012JS Amsterdam",
                "id": "adr-1",
                "centroide_ll": "POINT(4.89373 52.37302)",
                "centroide_rd": "POINT(121395 487350)",
                "gekoppeld_perceel": ["ASD21-Y-3930"],
                "score": 17.5
            }]
        }
    }"#;

    #[test]
    fn test_parse_full_document() {
        let docs = parse_response(DAM_RESPONSE).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_type.as_deref(), Some("adres"));

        let result = GeocodeResult::from_document(&docs[0]).unwrap();
        assert_eq!(result.point_native, Coord { x: 121395.0, y: 487350.0 });
        assert_eq!(result.point_geographic, Some(Coord { x: 4.89373, y: 52.37302 }));
        assert_eq!(result.linked_parcel_id.as_deref(), Some("ASD21-Y-3930"));
        assert_eq!(result.display_name.as_deref(), Some("Dam 1, 1012JS Amsterdam"));
    }

    #[test]
    fn test_linked_parcel_as_string() {
        let doc = LocationDocument {
            centroide_rd: Some("POINT(1 2)".to_string()),
            gekoppeld_perceel: Some(OneOrMany::One("ASD21-Y-1".to_string())),
            ..Default::default()
        };
        let result = GeocodeResult::from_document(&doc).unwrap();
        assert_eq!(result.linked_parcel_id.as_deref(), Some("ASD21-Y-1"));

        let doc: LocationDocument =
            serde_json::from_str(r#"{"centroide_rd": "POINT(1 2)", "gekoppeld_perceel": "X-A-2"}"#)
                .unwrap();
        assert_eq!(
            doc.gekoppeld_perceel.as_ref().and_then(OneOrMany::first),
            Some("X-A-2")
        );
    }

    #[test]
    fn test_empty_docs() {
        let docs = parse_response(r#"{"response": {"numFound": 0, "docs": []}}"#).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_or_bad_centroid() {
        let doc = LocationDocument::default();
        assert!(matches!(
            GeocodeResult::from_document(&doc),
            Err(ResolveError::MalformedGeocodeResponse(_))
        ));

        let doc = LocationDocument {
            centroide_rd: Some("POINT(abc)".to_string()),
            centroide_ll: Some("garbage".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            GeocodeResult::from_document(&doc),
            Err(ResolveError::MalformedGeocodeResponse(_))
        ));
    }

    #[test]
    fn test_bad_geographic_centroid_is_ignored() {
        let doc = LocationDocument {
            centroide_rd: Some("POINT(1 2)".to_string()),
            centroide_ll: Some("garbage".to_string()),
            ..Default::default()
        };
        let result = GeocodeResult::from_document(&doc).unwrap();
        assert!(result.point_geographic.is_none());
        assert!(result.linked_parcel_id.is_none());
    }

    #[test]
    fn test_non_json_body() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(ResolveError::MalformedGeocodeResponse(_))
        ));
    }
}

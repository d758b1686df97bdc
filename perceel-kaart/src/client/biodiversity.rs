//! Score biodiversité de la parcelle retenue (étape optionnelle)
//!
//! Un échec n'interrompt jamais la résolution : l'issue porte le message
//! d'erreur et la parcelle est renvoyée quand même.

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use kadaster::{ParcelCandidate, Service};

use super::http::send;

/// Issue de l'appel de score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BiodiversityOutcome {
    /// Corps JSON renvoyé tel quel
    Scored { data: Value },
    /// Échec non bloquant
    Failed { error: String },
}

impl BiodiversityOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

/// Corps de la requête : la parcelle en géométrie native (RD New)
pub fn payload(candidate: &ParcelCandidate) -> serde_json::Result<Value> {
    let feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(candidate.geometry.to_geojson())),
        id: None,
        properties: Some(candidate.properties.clone()),
        foreign_members: None,
    };
    let collection = FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    };

    Ok(json!({ "data": { "geometry": serde_json::to_value(collection)? } }))
}

#[derive(Debug, Clone)]
pub struct BiodiversityClient {
    client: Client,
    url: String,
}

impl BiodiversityClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Demande le score de la parcelle
    pub fn score(&self, candidate: &ParcelCandidate) -> BiodiversityOutcome {
        match self.fetch(candidate) {
            Ok(data) => {
                info!(parcel = ?candidate.local_id(), "Biodiversity score received");
                BiodiversityOutcome::Scored { data }
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Biodiversity scoring failed");
                BiodiversityOutcome::Failed {
                    error: "Failed to fetch biodiversity data".to_string(),
                }
            }
        }
    }

    /// Appel brut : corps JSON renvoyé par le service, ou l'erreur détaillée
    pub fn fetch(&self, candidate: &ParcelCandidate) -> Result<Value> {
        let body = payload(candidate).context("Failed to encode parcel payload")?;
        let request = self.client.post(&self.url).json(&body);
        let response = send(Service::Scoring, request)?;

        serde_json::from_str(&response).context("Invalid JSON body from scoring service")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use kadaster::ParcelGeometry;

    #[test]
    fn test_payload_shape() {
        let Value::Object(properties) = json!({ "perceelnummer": 3930 }) else {
            unreachable!()
        };
        let candidate = ParcelCandidate {
            id: None,
            geometry: ParcelGeometry::Polygon(polygon![
                (x: 121390.0, y: 487345.0),
                (x: 121400.0, y: 487345.0),
                (x: 121400.0, y: 487355.0),
                (x: 121390.0, y: 487345.0),
            ]),
            properties,
        };

        let body = payload(&candidate).unwrap();
        let collection = &body["data"]["geometry"];
        assert_eq!(collection["type"], "FeatureCollection");
        assert_eq!(collection["features"][0]["properties"]["perceelnummer"], 3930);
        assert_eq!(collection["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(
            collection["features"][0]["geometry"]["coordinates"][0][0][0],
            121390.0
        );

        let geometry: Geometry =
            serde_json::from_value(collection["features"][0]["geometry"].clone()).unwrap();
        assert!(matches!(geometry.value, geojson::Value::Polygon(_)));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = BiodiversityOutcome::Failed {
            error: "Failed to fetch biodiversity data".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "failed");
        assert!(!outcome.is_scored());
    }
}

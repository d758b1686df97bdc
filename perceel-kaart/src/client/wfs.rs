//! Client WFS des parcelles cadastrales (GetFeature, sortie GeoJSON)

use reqwest::blocking::Client;

use kadaster::parser::wfs::parse_feature_collection;
use kadaster::{BoundingBox, ParcelCandidate, ParcelSource, ResolveError, Service};

use super::http::send;

/// Nom du paramètre de type selon la version WFS
///
/// WFS 2.x utilise `typeNames`, les versions 1.x `typeName`.
pub fn type_param(version: &str) -> &'static str {
    if version.trim().starts_with('1') {
        "typeName"
    } else {
        "typeNames"
    }
}

/// Source de parcelles WFS
#[derive(Debug, Clone)]
pub struct WfsClient {
    client: Client,
    url: String,
    version: String,
    type_name: String,
}

impl WfsClient {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        version: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            version: version.into(),
            type_name: type_name.into(),
        }
    }

    /// Paramètres de la requête GetFeature
    pub fn query_params(&self, bbox: &BoundingBox, epsg: u32) -> Vec<(&'static str, String)> {
        vec![
            ("service", "WFS".to_string()),
            ("version", self.version.clone()),
            ("request", "GetFeature".to_string()),
            (type_param(&self.version), self.type_name.clone()),
            ("srsName", format!("EPSG:{}", epsg)),
            ("outputFormat", "application/json".to_string()),
            ("bbox", bbox.to_wfs_param(epsg)),
        ]
    }
}

impl ParcelSource for WfsClient {
    fn parcels_in(
        &self,
        bbox: &BoundingBox,
        epsg: u32,
    ) -> Result<Vec<ParcelCandidate>, ResolveError> {
        let request = self
            .client
            .get(&self.url)
            .query(&self.query_params(bbox, epsg));

        let body = send(Service::FeatureService, request)?;
        parse_feature_collection(&body)
    }
}

//! Fixtures partagées : réponses PDOK simulées autour du Dam (Amsterdam)

#![allow(dead_code)]

use perceel_kaart::ServiceConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Centroïde RD New de "Dam 1, Amsterdam"
pub const DAM_X: f64 = 121395.0;
pub const DAM_Y: f64 = 487350.0;

pub const GEOCODER_PATH: &str = "/bzk/locatieserver/search/v3_1/free";
pub const WFS_PATH: &str = "/kadaster/kadastralekaart/wfs/v5_0";
pub const SCORE_PATH: &str = "/score";

/// Configuration pointant vers le serveur simulé
pub fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        geocoder_url: format!("{}{}", server.uri(), GEOCODER_PATH),
        wfs_url: format!("{}{}", server.uri(), WFS_PATH),
        biodiversity_url: Some(format!("{}{}", server.uri(), SCORE_PATH)),
        timeout_secs: 2.0,
        ..Default::default()
    }
}

/// Réponse free search avec un seul document
pub fn locatie_body(linked: Option<&str>) -> String {
    let mut doc = json!({
        "type": "adres",
        "weergavenaam": "Dam 1, 1012JS Amsterdam",
        "id": "adr-dam-1",
        "centroide_ll": "POINT(4.89373549 52.37299607)",
        "centroide_rd": format!("POINT({} {})", DAM_X, DAM_Y),
        "score": 17.5
    });
    if let Some(linked) = linked {
        doc["gekoppeld_perceel"] = json!([linked]);
    }

    json!({ "response": { "numFound": 1, "start": 0, "docs": [doc] } }).to_string()
}

pub fn empty_locatie_body() -> String {
    json!({ "response": { "numFound": 0, "start": 0, "docs": [] } }).to_string()
}

/// Carré de 10 m dont le bord ouest est à `min_x`, centré en y sur le Dam
pub fn parcel(number: u64, min_x: f64) -> Value {
    let (x0, x1) = (min_x, min_x + 10.0);
    let (y0, y1) = (DAM_Y - 5.0, DAM_Y + 5.0);

    json!({
        "type": "Feature",
        "id": format!("perceel.{}", number),
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
        },
        "properties": {
            "AKRKadastraleGemeenteCodeWaarde": "ASD21",
            "sectie": "Y",
            "perceelnummer": number,
            "identificatieLokaalID": format!("ASD21Y0{}", number)
        }
    })
}

/// Trois parcelles à 12.1 m (ouest), 4.4 m et 30.0 m (est) du point
pub fn dam_parcels() -> Vec<Value> {
    vec![
        parcel(3929, DAM_X - 22.1),
        parcel(3930, DAM_X + 4.4),
        parcel(3931, DAM_X + 30.0),
    ]
}

pub fn wfs_body(features: Vec<Value>) -> String {
    json!({
        "type": "FeatureCollection",
        "numberMatched": features.len(),
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::28992" } },
        "features": features
    })
    .to_string()
}

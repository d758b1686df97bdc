//! Types de données pour le crate kadaster

use geo::Coord;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::geometry::ParcelGeometry;

/// Codes EPSG utilisés par le résolveur
pub mod epsg {
    /// Amersfoort / RD New, système natif du géocodeur et du WFS
    pub const RD_NEW: u32 = 28992;
    /// WGS84 géographique (x = longitude, y = latitude)
    pub const WGS84: u32 = 4326;
    /// Web Mercator
    pub const WEB_MERCATOR: u32 = 3857;
}

/// Noms des propriétés WFS `kadastralekaart:perceel`
pub mod fields {
    /// Code de la commune cadastrale (ex: "ASD21")
    pub const REGION_CODE: &str = "AKRKadastraleGemeenteCodeWaarde";
    /// Section cadastrale (ex: "Y")
    pub const SECTION_CODE: &str = "sectie";
    /// Numéro de parcelle (entier)
    pub const PARCEL_NUMBER: &str = "perceelnummer";
    /// Identifiant local affiché dans les popups
    pub const LOCAL_ID: &str = "identificatieLokaalID";
}

/// Meilleur candidat renvoyé par le géocodeur
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Point dans le système natif (RD New)
    pub point_native: Coord<f64>,

    /// Même point en WGS84 si le géocodeur le fournit
    pub point_geographic: Option<Coord<f64>>,

    /// Parcelle liée, format `{commune}-{section}-{numéro}`
    pub linked_parcel_id: Option<String>,

    /// Libellé de l'adresse trouvée
    pub display_name: Option<String>,
}

/// Fenêtre de recherche carrée dans le système natif
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Fenêtre `[x-r, y-r, x+r, y+r]` autour d'un point
    pub fn around(center: Coord<f64>, radius: f64) -> Self {
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    /// Paramètre `bbox` WFS, suffixé par le CRS
    pub fn to_wfs_param(&self, epsg: u32) -> String {
        format!(
            "{},{},{},{},EPSG:{}",
            self.min_x, self.min_y, self.max_x, self.max_y, epsg
        )
    }

    pub fn contains(&self, coord: Coord<f64>) -> bool {
        (self.min_x..=self.max_x).contains(&coord.x) && (self.min_y..=self.max_y).contains(&coord.y)
    }
}

/// Parcelle candidate renvoyée par le WFS
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelCandidate {
    /// Identifiant de la feature GeoJSON, si présent
    pub id: Option<String>,

    /// Géométrie dans le système natif
    pub geometry: ParcelGeometry,

    /// Attributs de la feature
    pub properties: Map<String, Value>,
}

impl ParcelCandidate {
    pub fn region_code(&self) -> Option<&str> {
        self.properties.get(fields::REGION_CODE)?.as_str()
    }

    pub fn section_code(&self) -> Option<&str> {
        self.properties.get(fields::SECTION_CODE)?.as_str()
    }

    /// Numéro de parcelle, accepté en nombre ou en chaîne numérique
    ///
    /// Un flottant entier (`3930.0`) vaut l'entier correspondant.
    pub fn parcel_number(&self) -> Option<u64> {
        match self.properties.get(fields::PARCEL_NUMBER)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| s.parse().ok().and_then(integral))
            }
            _ => None,
        }
    }

    /// Identifiant lisible (identificatieLokaalID, sinon id de feature)
    pub fn local_id(&self) -> Option<String> {
        match self.properties.get(fields::LOCAL_ID) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => self.id.clone(),
        }
    }
}

fn integral(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64)
        .then_some(value as u64)
}

/// Règle ayant désigné la parcelle retenue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Selection {
    /// Correspondance exacte avec la parcelle liée du géocodeur
    LinkedParcel { parcel_id: String },

    /// Candidat le plus proche du point géocodé
    Nearest {
        /// Distance plane dans le système natif (m)
        distance: f64,
        /// Nombre de correspondances du filtre parcelle liée (None sans id lié)
        linked_matches: Option<usize>,
    },
}

/// Résultat de la résolution adresse → parcelle
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParcel {
    /// Adresse d'origine, telle que saisie
    pub source_address: String,

    /// Géométrie reprojetée dans le système demandé
    pub geometry: ParcelGeometry,

    /// Point géocodé dans le système demandé
    pub location: Coord<f64>,

    /// EPSG du système demandé
    pub target_epsg: u32,

    /// Parcelle retenue, géométrie native
    pub candidate: ParcelCandidate,

    /// Résultat du géocodage
    pub geocode: GeocodeResult,

    /// Règle de sélection appliquée
    pub selection: Selection,

    /// Nombre de candidats dans la fenêtre
    pub candidate_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    #[allow(unused_imports)]
    use geo::polygon;
    use serde_json::json;

    fn candidate(properties: Value) -> ParcelCandidate {
        let Value::Object(properties) = properties else {
            panic!("properties must be an object");
        };
        ParcelCandidate {
            id: Some("perceel.1".to_string()),
            geometry: ParcelGeometry::Polygon(geo::polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]),
            properties,
        }
    }

    #[test]
    fn test_bbox_around() {
        let bbox = BoundingBox::around(Coord { x: 121395.0, y: 487350.0 }, 50.0);
        assert_eq!(bbox.min_x, 121345.0);
        assert_eq!(bbox.min_y, 487300.0);
        assert_eq!(bbox.max_x, 121445.0);
        assert_eq!(bbox.max_y, 487400.0);
        assert_eq!(bbox.to_wfs_param(28992), "121345,487300,121445,487400,EPSG:28992");
        assert!(bbox.contains(Coord { x: 121395.0, y: 487350.0 }));
    }

    #[test]
    fn test_candidate_accessors() {
        let c = candidate(json!({
            "AKRKadastraleGemeenteCodeWaarde": "ASD21",
            "sectie": "Y",
            "perceelnummer": 3930,
            "identificatieLokaalID": "56030393070000"
        }));
        assert_eq!(c.region_code(), Some("ASD21"));
        assert_eq!(c.section_code(), Some("Y"));
        assert_eq!(c.parcel_number(), Some(3930));
        assert_eq!(c.local_id().as_deref(), Some("56030393070000"));
    }

    #[test]
    fn test_parcel_number_as_string() {
        let c = candidate(json!({ "perceelnummer": " 42 " }));
        assert_eq!(c.parcel_number(), Some(42));
        assert_eq!(c.local_id().as_deref(), Some("perceel.1"));
    }

    #[test]
    fn test_parcel_number_as_integral_float() {
        assert_eq!(candidate(json!({ "perceelnummer": 3930.0 })).parcel_number(), Some(3930));
        assert_eq!(candidate(json!({ "perceelnummer": "3930.0" })).parcel_number(), Some(3930));
        assert_eq!(candidate(json!({ "perceelnummer": 3930.5 })).parcel_number(), None);
        assert_eq!(candidate(json!({ "perceelnummer": -1 })).parcel_number(), None);
    }

    #[test]
    fn test_selection_serialization() {
        let sel = Selection::Nearest {
            distance: 4.4,
            linked_matches: None,
        };
        let json = serde_json::to_value(&sel).unwrap();
        assert_eq!(json["method"], "nearest");
        assert_eq!(json["distance"], 4.4);
    }
}

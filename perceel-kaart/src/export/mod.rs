//! Modules d'export (GeoJSON, WKT) et reprojection PROJ optionnelle

pub mod geojson;
pub mod reproject;

pub use self::geojson::{export_to_geojson, parcel_feature, to_wkt};

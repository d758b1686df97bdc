//! Parsers des réponses des collaborateurs externes
//!
//! - `point` : représentation textuelle d'un point (`POINT(x y)`)
//! - `parcel_id` : identifiant de parcelle liée `{commune}-{section}-{numéro}`
//! - `locatie` : réponse du géocodeur PDOK Locatieserver
//! - `wfs` : FeatureCollection GeoJSON du WFS kadastrale kaart

pub mod locatie;
pub mod parcel_id;
pub mod point;
pub mod wfs;

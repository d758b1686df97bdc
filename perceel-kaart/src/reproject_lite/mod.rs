//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Supporte les systèmes utilisés autour du cadastre néerlandais :
//! - Amersfoort / RD New (EPSG:28992), système natif PDOK
//! - WGS84 (EPSG:4326), x = longitude, y = latitude en degrés
//! - Web Mercator (EPSG:3857)
//!
//! Toutes les paires sont supportées dans les deux sens.

mod datum;
mod ellipsoid;
mod mercator;
mod smart;
mod stereographic;

pub use smart::{Reprojection, SmartReprojector};

use geo::Coord;
use kadaster::{epsg, ParcelGeometry, TransformError};

use stereographic::ObliqueStereographic;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Reprojection légère entre RD New, WGS84 et Web Mercator
#[derive(Debug, Clone, Copy)]
pub struct ReprojectorLite {
    source_epsg: u32,
    target_epsg: u32,
    rd: ObliqueStereographic,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, TransformError> {
        if !Self::is_supported(source_epsg, target_epsg) {
            return Err(TransformError::Unsupported {
                from: source_epsg,
                to: target_epsg,
            });
        }

        Ok(Self {
            source_epsg,
            target_epsg,
            rd: ObliqueStereographic::rd_new(),
        })
    }

    /// Vérifie si l'EPSG est géré par reproject_lite
    pub fn is_supported_epsg(epsg: u32) -> bool {
        matches!(epsg, epsg::RD_NEW | epsg::WGS84 | epsg::WEB_MERCATOR)
    }

    /// Vérifie si la reprojection est supportée (source ≠ cible)
    pub fn is_supported(source: u32, target: u32) -> bool {
        source != target && Self::is_supported_epsg(source) && Self::is_supported_epsg(target)
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TransformError::Failed {
                x,
                y,
                reason: "non-finite coordinate".to_string(),
            });
        }

        // Étape 1: Source → Géographique (WGS84)
        let geo = self.source_to_geographic(x, y)?;

        // Étape 2: Géographique → Cible
        self.geographic_to_target(geo)
    }

    pub fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, TransformError> {
        let (x, y) = self.transform_point(coord.x, coord.y)?;
        Ok(Coord { x, y })
    }

    /// Transforme une géométrie sommet par sommet
    pub fn transform_geometry(
        &self,
        geom: &ParcelGeometry,
    ) -> Result<ParcelGeometry, TransformError> {
        geom.try_map_coords(|c| self.transform_coord(c))
    }

    /// Convertit les coordonnées source en géographique (WGS84)
    fn source_to_geographic(&self, x: f64, y: f64) -> Result<Geographic, TransformError> {
        match self.source_epsg {
            epsg::RD_NEW => Ok(datum::bessel_to_wgs84(self.rd.inverse(x, y)?)),
            epsg::WGS84 => {
                if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
                    return Err(TransformError::Failed {
                        x,
                        y,
                        reason: "longitude/latitude out of range".to_string(),
                    });
                }
                Ok(Geographic::from_degrees(x, y))
            }
            epsg::WEB_MERCATOR => Ok(mercator::web_mercator_to_geographic(x, y)),
            other => Err(TransformError::Unsupported {
                from: other,
                to: self.target_epsg,
            }),
        }
    }

    /// Convertit les coordonnées géographiques vers la cible
    fn geographic_to_target(&self, geo: Geographic) -> Result<(f64, f64), TransformError> {
        match self.target_epsg {
            epsg::RD_NEW => self.rd.forward(datum::wgs84_to_bessel(geo)),
            epsg::WGS84 => Ok(geo.to_degrees()),
            epsg::WEB_MERCATOR => Ok(mercator::geographic_to_web_mercator(geo)),
            other => Err(TransformError::Unsupported {
                from: self.source_epsg,
                to: other,
            }),
        }
    }
}

//! Reprojection de géométries avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

/// Vérifie si la reprojection PROJ est disponible
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}

#[cfg(feature = "reproject")]
use geo::{Coord, LineString, Polygon};
#[cfg(feature = "reproject")]
use kadaster::{ParcelGeometry, TransformError};
#[cfg(feature = "reproject")]
use proj::Proj;

/// Reprojection de géométries entre deux systèmes de coordonnées
#[cfg(feature = "reproject")]
pub struct Reprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

#[cfg(feature = "reproject")]
impl Reprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, TransformError> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).map_err(|e| {
            tracing::warn!(%source, %target, error = %e, "PROJ could not create transformation");
            TransformError::Unsupported {
                from: source_epsg,
                to: target_epsg,
            }
        })?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Transforme une coordonnée unique
    pub fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, TransformError> {
        let (x, y) = self
            .proj
            .convert((coord.x, coord.y))
            .map_err(|e| TransformError::Failed {
                x: coord.x,
                y: coord.y,
                reason: e.to_string(),
            })?;
        Ok(Coord { x, y })
    }

    /// Transforme une géométrie (conversion batch par ring)
    pub fn transform_geometry(
        &self,
        geom: &ParcelGeometry,
    ) -> Result<ParcelGeometry, TransformError> {
        if self.source_epsg == self.target_epsg {
            return Ok(geom.clone());
        }

        match geom {
            ParcelGeometry::Polygon(p) => Ok(ParcelGeometry::Polygon(self.transform_polygon(p)?)),
            ParcelGeometry::MultiPolygon(mp) => {
                let polys: Result<Vec<Polygon<f64>>, TransformError> =
                    mp.iter().map(|p| self.transform_polygon(p)).collect();
                Ok(ParcelGeometry::MultiPolygon(geo::MultiPolygon::new(polys?)))
            }
        }
    }

    /// Transforme un ring (batch)
    fn transform_linestring(&self, ls: &LineString<f64>) -> Result<LineString<f64>, TransformError> {
        let mut coords: Vec<(f64, f64)> = ls.0.iter().map(|c| (c.x, c.y)).collect();

        self.proj
            .convert_array(&mut coords)
            .map_err(|e| TransformError::Failed {
                x: ls.0.first().map_or(f64::NAN, |c| c.x),
                y: ls.0.first().map_or(f64::NAN, |c| c.y),
                reason: format!("batch conversion failed: {}", e),
            })?;

        let result: Vec<Coord<f64>> = coords.into_iter().map(|(x, y)| Coord { x, y }).collect();
        Ok(LineString::new(result))
    }

    fn transform_polygon(&self, p: &Polygon<f64>) -> Result<Polygon<f64>, TransformError> {
        let exterior = self.transform_linestring(p.exterior())?;
        let interiors: Result<Vec<LineString<f64>>, TransformError> = p
            .interiors()
            .iter()
            .map(|ls| self.transform_linestring(ls))
            .collect();
        Ok(Polygon::new(exterior, interiors?))
    }
}

//! Interface de l'utilitaire de transformation de coordonnées

use geo::Coord;

use crate::error::TransformError;
use crate::geometry::ParcelGeometry;

/// Transformation de coordonnées pure (sans I/O), déterministe et inversible
pub trait CoordinateTransform {
    /// Transforme un point de `from` vers `to` (codes EPSG)
    fn transform(&self, coord: Coord<f64>, from: u32, to: u32)
        -> Result<Coord<f64>, TransformError>;

    /// Transforme chaque sommet de chaque ring, structure et ordre conservés
    fn transform_geometry(
        &self,
        geometry: &ParcelGeometry,
        from: u32,
        to: u32,
    ) -> Result<ParcelGeometry, TransformError> {
        if from == to {
            return Ok(geometry.clone());
        }
        geometry.try_map_coords(|c| self.transform(c, from, to))
    }
}

impl<T: CoordinateTransform + ?Sized> CoordinateTransform for &T {
    fn transform(
        &self,
        coord: Coord<f64>,
        from: u32,
        to: u32,
    ) -> Result<Coord<f64>, TransformError> {
        (**self).transform(coord, from, to)
    }

    fn transform_geometry(
        &self,
        geometry: &ParcelGeometry,
        from: u32,
        to: u32,
    ) -> Result<ParcelGeometry, TransformError> {
        (**self).transform_geometry(geometry, from, to)
    }
}

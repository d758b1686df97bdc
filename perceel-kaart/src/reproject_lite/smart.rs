//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use geo::Coord;
use kadaster::{CoordinateTransform, ParcelGeometry, TransformError};

use super::ReprojectorLite;

/// Reprojection intelligente
///
/// Essaie d'abord reproject_lite (pure Rust), puis fallback sur proj si disponible.
pub enum SmartReprojector {
    /// Reprojection légère (pure Rust)
    Lite(ReprojectorLite),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(crate::export::reproject::Reprojector),
    /// Pas de reprojection (source == cible)
    Identity,
}

impl SmartReprojector {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, TransformError> {
        // Pas de reprojection nécessaire
        if source_epsg == target_epsg {
            return Ok(Self::Identity);
        }

        // Essayer reproject_lite d'abord
        if ReprojectorLite::is_supported(source_epsg, target_epsg) {
            let lite = ReprojectorLite::new(source_epsg, target_epsg)?;
            return Ok(Self::Lite(lite));
        }

        // Fallback sur proj si disponible
        #[cfg(feature = "reproject")]
        {
            let proj = crate::export::reproject::Reprojector::new(source_epsg, target_epsg)?;
            return Ok(Self::Proj(proj));
        }

        // Aucune option disponible
        #[cfg(not(feature = "reproject"))]
        return Err(TransformError::Unsupported {
            from: source_epsg,
            to: target_epsg,
        });
    }

    pub fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, TransformError> {
        match self {
            Self::Identity => Ok(coord),
            Self::Lite(lite) => lite.transform_coord(coord),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_coord(coord),
        }
    }

    /// Transforme une géométrie
    pub fn transform_geometry(
        &self,
        geom: &ParcelGeometry,
    ) -> Result<ParcelGeometry, TransformError> {
        match self {
            Self::Identity => Ok(geom.clone()),
            Self::Lite(lite) => lite.transform_geometry(geom),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_geometry(geom),
        }
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity (pas de reprojection)",
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}

/// Utilitaire de transformation injecté dans le résolveur
///
/// Sans état : le reprojector est choisi à chaque appel selon la paire EPSG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reprojection;

impl CoordinateTransform for Reprojection {
    fn transform(
        &self,
        coord: Coord<f64>,
        from: u32,
        to: u32,
    ) -> Result<Coord<f64>, TransformError> {
        SmartReprojector::new(from, to)?.transform_coord(coord)
    }

    fn transform_geometry(
        &self,
        geometry: &ParcelGeometry,
        from: u32,
        to: u32,
    ) -> Result<ParcelGeometry, TransformError> {
        let reprojector = SmartReprojector::new(from, to)?;
        tracing::debug!(from, to, method = reprojector.description(), "Reprojecting parcel");
        reprojector.transform_geometry(geometry)
    }
}

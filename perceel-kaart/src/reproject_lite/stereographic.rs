//! Projection stéréographique oblique (EPSG:9809), utilisée par RD New
//!
//! Double projection : l'ellipsoïde est d'abord représenté conformément sur
//! une sphère de Gauss, puis projeté stéréographiquement.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use kadaster::TransformError;

use super::ellipsoid::Bessel1841;
use super::Geographic;

/// Paramètres de définition
struct Params {
    lat0: f64,
    lon0: f64,
    k0: f64,
    x0: f64,
    y0: f64,
}

/// Amersfoort / RD New (EPSG:28992)
const RD_NEW: Params = Params {
    lat0: 52.156_160_555_555_55,
    lon0: 5.387_638_888_888_89,
    k0: 0.9999079,
    x0: 155000.0,
    y0: 463000.0,
};

/// Projection stéréographique oblique avec constantes dérivées
#[derive(Debug, Clone, Copy)]
pub struct ObliqueStereographic {
    e: f64,
    e2: f64,
    lon0: f64,
    k0: f64,
    x0: f64,
    y0: f64,
    /// Rayon de la sphère conforme
    r: f64,
    n: f64,
    c: f64,
    /// Latitude conforme de l'origine
    chi0: f64,
}

impl ObliqueStereographic {
    /// Projection RD New sur l'ellipsoïde de Bessel
    pub fn rd_new() -> Self {
        Self::new(&RD_NEW, Bessel1841::A, Bessel1841::E2, Bessel1841::E)
    }

    fn new(params: &Params, a: f64, e2: f64, e: f64) -> Self {
        let lat0 = params.lat0.to_radians();
        let sin0 = lat0.sin();

        let rho0 = a * (1.0 - e2) / (1.0 - e2 * sin0 * sin0).powf(1.5);
        let nu0 = a / (1.0 - e2 * sin0 * sin0).sqrt();
        let r = (rho0 * nu0).sqrt();
        let n = (1.0 + e2 * lat0.cos().powi(4) / (1.0 - e2)).sqrt();

        let s1 = (1.0 + sin0) / (1.0 - sin0);
        let s2 = (1.0 - e * sin0) / (1.0 + e * sin0);
        let w1 = (s1 * s2.powf(e)).powf(n);
        let sin_chi0 = (w1 - 1.0) / (w1 + 1.0);
        let c = (n + sin0) * (1.0 - sin_chi0) / ((n - sin0) * (1.0 + sin_chi0));
        let w2 = c * w1;
        let chi0 = ((w2 - 1.0) / (w2 + 1.0)).asin();

        Self {
            e,
            e2,
            lon0: params.lon0.to_radians(),
            k0: params.k0,
            x0: params.x0,
            y0: params.y0,
            r,
            n,
            c,
            chi0,
        }
    }

    /// Géographique (Bessel, rad) → coordonnées projetées (m)
    pub fn forward(&self, geo: Geographic) -> Result<(f64, f64), TransformError> {
        let lambda = self.n * (geo.lon - self.lon0) + self.lon0;
        let sin_lat = geo.lat.sin();

        let sa = (1.0 + sin_lat) / (1.0 - sin_lat);
        let sb = (1.0 - self.e * sin_lat) / (1.0 + self.e * sin_lat);
        let w = self.c * (sa * sb.powf(self.e)).powf(self.n);
        let chi = ((w - 1.0) / (w + 1.0)).asin();

        let dl = lambda - self.lon0;
        let b = 1.0 + chi.sin() * self.chi0.sin() + chi.cos() * self.chi0.cos() * dl.cos();
        if !(b > 1e-12) {
            return Err(TransformError::Failed {
                x: geo.lon.to_degrees(),
                y: geo.lat.to_degrees(),
                reason: "point at the antipode of the projection origin".to_string(),
            });
        }

        let k = 2.0 * self.r * self.k0 / b;
        let x = self.x0 + k * chi.cos() * dl.sin();
        let y = self.y0
            + k * (chi.sin() * self.chi0.cos() - chi.cos() * self.chi0.sin() * dl.cos());
        Ok((x, y))
    }

    /// Coordonnées projetées (m) → géographique (Bessel, rad)
    pub fn inverse(&self, x: f64, y: f64) -> Result<Geographic, TransformError> {
        let de = x - self.x0;
        let dn = y - self.y0;
        let rk = self.r * self.k0;

        let g = 2.0 * rk * (FRAC_PI_4 - self.chi0 / 2.0).tan();
        let h = 4.0 * rk * self.chi0.tan() + g;
        let i = (de / (h + dn)).atan();
        let j = (de / (g - dn)).atan() - i;

        let chi = self.chi0 + 2.0 * ((dn - de * (j / 2.0).tan()) / (2.0 * rk)).atan();
        let lambda = j + 2.0 * i + self.lon0;
        let lon = (lambda - self.lon0) / self.n + self.lon0;

        let psi = 0.5 * ((1.0 + chi.sin()) / (self.c * (1.0 - chi.sin()))).ln() / self.n;
        let mut lat = 2.0 * psi.exp().atan() - FRAC_PI_2;

        for _ in 0..30 {
            let sin_lat = lat.sin();
            let psi_i = ((lat / 2.0 + FRAC_PI_4).tan()
                * ((1.0 - self.e * sin_lat) / (1.0 + self.e * sin_lat)).powf(self.e / 2.0))
            .ln();
            let next = lat - (psi_i - psi) * lat.cos() * (1.0 - self.e2 * sin_lat * sin_lat)
                / (1.0 - self.e2);
            if (next - lat).abs() < 1e-14 {
                return Ok(Geographic::new(lon, next));
            }
            lat = next;
        }

        if lat.is_finite() && lon.is_finite() {
            Ok(Geographic::new(lon, lat))
        } else {
            Err(TransformError::Failed {
                x,
                y,
                reason: "inverse stereographic projection did not converge".to_string(),
            })
        }
    }
}

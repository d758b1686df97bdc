//! Changement de datum Amersfoort (Bessel 1841) ↔ WGS84
//!
//! Passage par les coordonnées géocentriques et une similitude à 7
//! paramètres (convention position vector).

use super::ellipsoid::{Bessel1841, WGS84};
use super::Geographic;

/// Une seconde d'arc en radians
const ARC_SECOND: f64 = std::f64::consts::PI / 648000.0;

/// Similitude de Helmert à 7 paramètres (position vector)
#[derive(Debug, Clone, Copy)]
pub struct Helmert {
    /// Translations (m)
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations (rad)
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Facteur d'échelle (1 + ppm * 1e-6)
    pub scale: f64,
}

/// Amersfoort → WGS84 (towgs84 classique d'EPSG:28992)
pub const AMERSFOORT_TO_WGS84: Helmert = Helmert {
    tx: 565.417,
    ty: 50.3319,
    tz: 465.552,
    rx: -0.398957 * ARC_SECOND,
    ry: 0.343988 * ARC_SECOND,
    rz: -1.8774 * ARC_SECOND,
    scale: 1.0 + 4.0725e-6,
};

impl Helmert {
    /// Matrice M telle que sortie = T + M · entrée
    fn matrix(&self) -> [[f64; 3]; 3] {
        let m = self.scale;
        [
            [m, -m * self.rz, m * self.ry],
            [m * self.rz, m, -m * self.rx],
            [-m * self.ry, m * self.rx, m],
        ]
    }

    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let m = self.matrix();
        [
            self.tx + m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2],
            self.ty + m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2],
            self.tz + m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2],
        ]
    }

    /// Inverse exacte (matrice adjointe / déterminant)
    pub fn apply_inverse(&self, p: [f64; 3]) -> [f64; 3] {
        let m = self.matrix();
        let v = [p[0] - self.tx, p[1] - self.ty, p[2] - self.tz];

        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let c10 = m[0][2] * m[2][1] - m[0][1] * m[2][2];
        let c11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let c12 = m[0][1] * m[2][0] - m[0][0] * m[2][1];
        let c20 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let c21 = m[0][2] * m[1][0] - m[0][0] * m[1][2];
        let c22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;

        [
            (c00 * v[0] + c10 * v[1] + c20 * v[2]) / det,
            (c01 * v[0] + c11 * v[1] + c21 * v[2]) / det,
            (c02 * v[0] + c12 * v[1] + c22 * v[2]) / det,
        ]
    }
}

/// Géographique (rad) + hauteur ellipsoïdale → géocentrique
pub fn geodetic_to_ecef(geo: Geographic, h: f64, a: f64, e2: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = geo.lat.sin_cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    [
        (n + h) * cos_lat * geo.lon.cos(),
        (n + h) * cos_lat * geo.lon.sin(),
        (n * (1.0 - e2) + h) * sin_lat,
    ]
}

/// Géocentrique → géographique (rad) + hauteur ellipsoïdale
pub fn ecef_to_geodetic(p: [f64; 3], a: f64, e2: f64) -> (Geographic, f64) {
    let [x, y, z] = p;
    let lon = y.atan2(x);
    let r = x.hypot(y);

    // Axe polaire
    if r < 1e-9 {
        let b = a * (1.0 - e2).sqrt();
        let lat = std::f64::consts::FRAC_PI_2.copysign(z);
        return (Geographic::new(lon, lat), z.abs() - b);
    }

    let normal = |lat: f64| a / (1.0 - e2 * lat.sin().powi(2)).sqrt();

    let mut lat = z.atan2(r * (1.0 - e2));
    for _ in 0..20 {
        let n = normal(lat);
        let h = r / lat.cos() - n;
        let new_lat = z.atan2(r * (1.0 - e2 * n / (n + h)));
        if (new_lat - lat).abs() < 1e-15 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    let h = r / lat.cos() - normal(lat);
    (Geographic::new(lon, lat), h)
}

/// Amersfoort (Bessel, hauteur nulle) → WGS84
pub fn bessel_to_wgs84(geo: Geographic) -> Geographic {
    let p = geodetic_to_ecef(geo, 0.0, Bessel1841::A, Bessel1841::E2);
    let p = AMERSFOORT_TO_WGS84.apply(p);
    ecef_to_geodetic(p, WGS84::A, WGS84::E2).0
}

/// WGS84 → Amersfoort (Bessel)
///
/// La hauteur WGS84 est ajustée pour que le point retombe à hauteur nulle
/// sur Bessel, ce qui fait de cette fonction l'inverse de [`bessel_to_wgs84`].
pub fn wgs84_to_bessel(geo: Geographic) -> Geographic {
    let mut h_wgs = 0.0;
    let mut result = geo;

    for _ in 0..5 {
        let p = geodetic_to_ecef(geo, h_wgs, WGS84::A, WGS84::E2);
        let p = AMERSFOORT_TO_WGS84.apply_inverse(p);
        let (bessel, h_bessel) = ecef_to_geodetic(p, Bessel1841::A, Bessel1841::E2);
        result = bessel;
        if h_bessel.abs() < 1e-9 {
            break;
        }
        h_wgs -= h_bessel;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helmert_inverse() {
        let p = [3_904_000.0, 333_000.0, 5_012_000.0];
        let back = AMERSFOORT_TO_WGS84.apply_inverse(AMERSFOORT_TO_WGS84.apply(p));
        for i in 0..3 {
            assert!((back[i] - p[i]).abs() < 1e-8, "axis {}: {}", i, back[i] - p[i]);
        }
    }

    #[test]
    fn test_ecef_roundtrip() {
        let geo = Geographic::from_degrees(5.387, 52.155);
        let p = geodetic_to_ecef(geo, 42.0, WGS84::A, WGS84::E2);
        let (back, h) = ecef_to_geodetic(p, WGS84::A, WGS84::E2);
        assert!((back.lon - geo.lon).abs() < 1e-14);
        assert!((back.lat - geo.lat).abs() < 1e-14);
        assert!((h - 42.0).abs() < 1e-6, "h={}", h);
    }

    #[test]
    fn test_datum_shift_roundtrip() {
        let bessel = Geographic::from_degrees(4.8945, 52.3736);
        let wgs = bessel_to_wgs84(bessel);

        // Décalage de l'ordre de 100 m entre les deux datums
        assert!((wgs.lat - bessel.lat).abs() > 1e-6);

        let back = wgs84_to_bessel(wgs);
        assert!((back.lon - bessel.lon).abs() < 1e-13);
        assert!((back.lat - bessel.lat).abs() < 1e-13);
    }
}

//! Projection Web Mercator (EPSG:3857)
//!
//! Aussi connu sous le nom de Pseudo-Mercator ou Spherical Mercator.
//! Utilisé par Google Maps, OpenStreetMap, etc.

use super::ellipsoid::WGS84;
use super::Geographic;

/// Latitude maximale représentable (degrés)
pub const MAX_LATITUDE: f64 = 85.0;

/// Convertit coordonnées géographiques vers Web Mercator (EPSG:3857)
pub fn geographic_to_web_mercator(geo: Geographic) -> (f64, f64) {
    // Web Mercator utilise un modèle sphérique avec le rayon équatorial
    let r = WGS84::A;

    // Limiter la latitude pour éviter l'infini
    let max = MAX_LATITUDE.to_radians();
    let lat = geo.lat.clamp(-max, max);

    // X = R * longitude
    let x = r * geo.lon;

    // Y = R * ln(tan(π/4 + lat/2))
    let y = r * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

    (x, y)
}

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Geographic {
    let r = WGS84::A;

    // Longitude = x / R
    let lon = x / r;

    // Latitude = 2 * atan(exp(y/R)) - π/2
    let lat = 2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2;

    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amsterdam_to_web_mercator() {
        // Dam, Amsterdam : 4.8937°E, 52.3730°N
        let geo = Geographic::from_degrees(4.893735485125782, 52.3729960734801);
        let (x, y) = geographic_to_web_mercator(geo);

        assert!((x - 544768.14).abs() < 0.01, "x={}", x);
        assert!((y - 6867850.96).abs() < 0.01, "y={}", y);
    }

    #[test]
    fn test_roundtrip() {
        let geo = Geographic::from_degrees(4.89, 52.37);
        let (x, y) = geographic_to_web_mercator(geo);
        let (lon, lat) = web_mercator_to_geographic(x, y).to_degrees();

        assert!((lon - 4.89).abs() < 1e-12, "lon={}", lon);
        assert!((lat - 52.37).abs() < 1e-12, "lat={}", lat);
    }

    #[test]
    fn test_latitude_is_clamped() {
        let (_, y_pole) = geographic_to_web_mercator(Geographic::from_degrees(0.0, 89.9));
        let (_, y_max) = geographic_to_web_mercator(Geographic::from_degrees(0.0, MAX_LATITUDE));
        assert_eq!(y_pole, y_max);
    }
}

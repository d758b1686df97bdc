//! Définitions des ellipsoïdes

/// Ellipsoïde WGS84
pub struct WGS84;

impl WGS84 {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub const A: f64 = 6378137.0;

    /// Aplatissement
    pub const F: f64 = 1.0 / 298.257223563;

    /// Première excentricité au carré
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;
}

/// Ellipsoïde de Bessel 1841 (datum Amersfoort, RD New)
pub struct Bessel1841;

impl Bessel1841 {
    pub const A: f64 = 6377397.155;
    pub const F: f64 = 1.0 / 299.1528128;
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;
    pub const E: f64 = 0.08169683122252751; // sqrt(E2)
}

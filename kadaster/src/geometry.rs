//! Géométrie surfacique d'une parcelle (Polygon ou MultiPolygon)

use geo::{Contains, Coord, EuclideanDistance, Geometry, LineString, MultiPolygon, Point, Polygon};

/// Géométrie d'une parcelle cadastrale
///
/// Invariant : chaque ring contient au moins 4 positions et est fermé.
#[derive(Debug, Clone, PartialEq)]
pub enum ParcelGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl ParcelGeometry {
    /// Polygones constitutifs, dans l'ordre des parties
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(mp) => &mp.0,
        }
    }

    /// Nombre total de rings (extérieurs + intérieurs)
    pub fn ring_count(&self) -> usize {
        self.polygons()
            .iter()
            .map(|p| 1 + p.interiors().len())
            .sum()
    }

    /// Nombre total de positions, fermetures comprises
    pub fn vertex_count(&self) -> usize {
        self.polygons()
            .iter()
            .map(|p| {
                p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>()
            })
            .sum()
    }

    /// Vérifie l'invariant des rings (≥ 4 positions, fermés)
    pub fn has_valid_rings(&self) -> bool {
        self.polygons().iter().all(|p| {
            std::iter::once(p.exterior())
                .chain(p.interiors().iter())
                .all(|ring| ring.0.len() >= 4 && ring.is_closed())
        })
    }

    /// Distance euclidienne plane au point (0 si le point est dans la surface)
    pub fn distance_to(&self, point: Coord<f64>) -> f64 {
        let point = Point::from(point);
        self.polygons()
            .iter()
            .map(|poly| {
                if poly.contains(&point) {
                    0.0
                } else {
                    point.euclidean_distance(poly)
                }
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Applique `f` à chaque sommet de chaque ring, en conservant la structure
    pub fn try_map_coords<E, F>(&self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Coord<f64>) -> Result<Coord<f64>, E>,
    {
        match self {
            Self::Polygon(poly) => Ok(Self::Polygon(map_polygon(poly, &mut f)?)),
            Self::MultiPolygon(mp) => {
                let polys: Result<Vec<Polygon<f64>>, E> =
                    mp.iter().map(|poly| map_polygon(poly, &mut f)).collect();
                Ok(Self::MultiPolygon(MultiPolygon::new(polys?)))
            }
        }
    }

    /// Conversion vers `geo::Geometry`
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Self::Polygon(p) => Geometry::Polygon(p.clone()),
            Self::MultiPolygon(mp) => Geometry::MultiPolygon(mp.clone()),
        }
    }

    /// Conversion vers une valeur GeoJSON
    pub fn to_geojson(&self) -> geojson::Value {
        match self {
            Self::Polygon(p) => geojson::Value::Polygon(polygon_positions(p)),
            Self::MultiPolygon(mp) => {
                geojson::Value::MultiPolygon(mp.iter().map(polygon_positions).collect())
            }
        }
    }

    /// Construit une géométrie depuis une valeur GeoJSON
    ///
    /// Seuls Polygon et MultiPolygon sont acceptés. Un ring non fermé d'au moins
    /// 3 positions est fermé automatiquement, un ring plus court est rejeté.
    pub fn from_geojson(value: &geojson::Value) -> Result<Self, String> {
        match value {
            geojson::Value::Polygon(rings) => Ok(Self::Polygon(polygon_from_positions(rings)?)),
            geojson::Value::MultiPolygon(parts) => {
                if parts.is_empty() {
                    return Err("empty MultiPolygon".to_string());
                }
                let polys: Result<Vec<Polygon<f64>>, String> =
                    parts.iter().map(|rings| polygon_from_positions(rings)).collect();
                Ok(Self::MultiPolygon(MultiPolygon::new(polys?)))
            }
            other => Err(format!("unsupported geometry type {}", value_type(other))),
        }
    }
}

fn value_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn map_polygon<E, F>(poly: &Polygon<f64>, f: &mut F) -> Result<Polygon<f64>, E>
where
    F: FnMut(Coord<f64>) -> Result<Coord<f64>, E>,
{
    let exterior = map_ring(poly.exterior(), f)?;
    let interiors: Result<Vec<LineString<f64>>, E> =
        poly.interiors().iter().map(|ring| map_ring(ring, f)).collect();
    Ok(Polygon::new(exterior, interiors?))
}

fn map_ring<E, F>(ring: &LineString<f64>, f: &mut F) -> Result<LineString<f64>, E>
where
    F: FnMut(Coord<f64>) -> Result<Coord<f64>, E>,
{
    let coords: Result<Vec<Coord<f64>>, E> = ring.coords().map(|c| f(*c)).collect();
    Ok(LineString::new(coords?))
}

fn polygon_positions(poly: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    std::iter::once(poly.exterior())
        .chain(poly.interiors().iter())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
        .collect()
}

fn polygon_from_positions(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|ring| ring_from_positions(ring));
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon without exterior ring".to_string())??;
    let interiors: Result<Vec<LineString<f64>>, String> = rings.collect();
    Ok(Polygon::new(exterior, interiors?))
}

fn ring_from_positions(positions: &[Vec<f64>]) -> Result<LineString<f64>, String> {
    let coords: Result<Vec<Coord<f64>>, String> = positions
        .iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!("invalid position {:?}", pos)),
        })
        .collect();
    let mut coords = coords?;

    let closed = coords.len() > 1 && coords.first() == coords.last();
    let distinct = if closed { coords.len() - 1 } else { coords.len() };
    if distinct < 3 {
        return Err(format!("ring with {} distinct positions", distinct));
    }

    if !closed {
        tracing::warn!(points = coords.len(), "Auto-closing unclosed ring");
        coords.push(coords[0]);
    }

    Ok(LineString::new(coords))
}

//! Parser pour les points WKT renvoyés par le géocodeur

use std::sync::OnceLock;

use geo::Coord;
use regex::Regex;

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static POINT_RE: OnceLock<Regex> = OnceLock::new();

fn point_regex() -> Result<&'static Regex, regex::Error> {
    if let Some(re) = POINT_RE.get() {
        return Ok(re);
    }
    // POINT(x y), POINT (x y) ou simplement "x y"
    let pattern = format!(
        r"(?i)^\s*(?:POINT\s*\(\s*(?P<x>{n})\s+(?P<y>{n})\s*\)|(?P<bx>{n})\s+(?P<by>{n}))\s*$",
        n = NUMBER
    );
    let re = Regex::new(&pattern)?;
    Ok(POINT_RE.get_or_init(|| re))
}

/// Extrait les deux composantes numériques d'un point
pub fn parse(text: &str) -> Result<Coord<f64>, String> {
    let re = point_regex().map_err(|e| e.to_string())?;
    let caps = re
        .captures(text)
        .ok_or_else(|| format!("not a point: {:?}", text))?;

    let x = caps.name("x").or_else(|| caps.name("bx"));
    let y = caps.name("y").or_else(|| caps.name("by"));
    let (Some(x), Some(y)) = (x, y) else {
        return Err(format!("not a point: {:?}", text));
    };

    let x: f64 = x
        .as_str()
        .parse()
        .map_err(|e| format!("invalid x in {:?}: {}", text, e))?;
    let y: f64 = y
        .as_str()
        .parse()
        .map_err(|e| format!("invalid y in {:?}: {}", text, e))?;

    if !x.is_finite() || !y.is_finite() {
        return Err(format!("non-finite coordinate in {:?}", text));
    }

    Ok(Coord { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped() {
        let c = parse("POINT(121395 487350)").unwrap();
        assert_eq!(c, Coord { x: 121395.0, y: 487350.0 });

        let c = parse("POINT (4.89373 52.37302)").unwrap();
        assert_eq!(c, Coord { x: 4.89373, y: 52.37302 });
    }

    #[test]
    fn test_parse_bare_and_lowercase() {
        assert_eq!(parse("  10.5 -3 ").unwrap(), Coord { x: 10.5, y: -3.0 });
        assert_eq!(parse("point(1e3 2E2)").unwrap(), Coord { x: 1000.0, y: 200.0 });
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("").is_err());
        assert!(parse("POINT()").is_err());
        assert!(parse("POINT(121395)").is_err());
        assert!(parse("POINT(abc def)").is_err());
        assert!(parse("POINT(1 2").is_err());
        assert!(parse("LINESTRING(1 2, 3 4)").is_err());
    }
}

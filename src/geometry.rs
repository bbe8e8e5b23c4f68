//! Planar geometry kernel: GeoJSON parsing, point-in-polygon, haversine
//! distance and bounding-box math.
//!
//! Pure and side-effect free. Coordinates are WGS84 degrees; trigonometric
//! conversions happen inside this module only.

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Mean Earth radius in metres, as fixed by the distance contract.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const METERS_PER_DEG: f64 = 111_000.0;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("empty geometry")]
    Empty,

    #[error("invalid GeoJSON: {0}")]
    Invalid(String),

    #[error("unsupported geometry type: {0}")]
    Unsupported(String),
}

/// Closed axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Rectangle grown by `margin` degrees on every side.
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            min_lat: self.min_lat - margin,
            max_lat: self.max_lat + margin,
            min_lon: self.min_lon - margin,
            max_lon: self.max_lon + margin,
        }
    }

    /// Centre of the rectangle as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// A parsed polygonal geometry. `Polygon` inputs are promoted to a
/// single-member multipolygon so containment has one code path.
#[derive(Debug, Clone)]
pub struct Geometry(MultiPolygon<f64>);

impl Geometry {
    /// Exact point-in-polygon test. Holes subtract; for a multipolygon any
    /// member polygon suffices. Points exactly on a boundary are excluded.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.0.contains(&Point::new(lon, lat))
    }
}

/// Parses GeoJSON text into a polygonal geometry.
///
/// Only bare `Polygon` and `MultiPolygon` geometry objects are accepted;
/// features, collections and line geometries are rejected here.
pub fn parse(text: &str) -> Result<Geometry, GeometryError> {
    if text.trim().is_empty() {
        return Err(GeometryError::Empty);
    }

    let geojson: GeoJson = text
        .parse()
        .map_err(|e| GeometryError::Invalid(format!("{e}")))?;

    let geom = match geojson {
        GeoJson::Geometry(g) => g,
        GeoJson::Feature(_) => return Err(GeometryError::Unsupported("Feature".into())),
        GeoJson::FeatureCollection(_) => {
            return Err(GeometryError::Unsupported("FeatureCollection".into()))
        }
    };

    match geom.value {
        geojson::Value::Polygon(ref coords) => {
            let polygon = polygon_from_coords(coords).ok_or(GeometryError::Empty)?;
            Ok(Geometry(MultiPolygon::new(vec![polygon])))
        }
        geojson::Value::MultiPolygon(ref multi) => {
            let polygons: Vec<Polygon<f64>> =
                multi.iter().filter_map(|c| polygon_from_coords(c)).collect();
            if polygons.is_empty() {
                return Err(GeometryError::Empty);
            }
            Ok(Geometry(MultiPolygon::new(polygons)))
        }
        ref other => Err(GeometryError::Unsupported(value_type_name(other).into())),
    }
}

fn value_type_name(value: &geojson::Value) -> &'static str {
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

/// Convert GeoJSON polygon rings (exterior first, then holes) to a geo Polygon.
fn polygon_from_coords(coords: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    if coords.is_empty() {
        return None;
    }

    let exterior = linestring_from_coords(&coords[0])?;
    let interiors: Vec<LineString<f64>> = coords[1..]
        .iter()
        .filter_map(|ring| linestring_from_coords(ring))
        .collect();

    Some(Polygon::new(exterior, interiors))
}

fn linestring_from_coords(coords: &[Vec<f64>]) -> Option<LineString<f64>> {
    let points: Vec<Coord<f64>> = coords
        .iter()
        .filter_map(|position| {
            if position.len() >= 2 {
                Some(Coord {
                    x: position[0],
                    y: position[1],
                })
            } else {
                None
            }
        })
        .collect();

    if points.is_empty() {
        None
    } else {
        Some(LineString::from(points))
    }
}

/// Great-circle distance in metres between two WGS84 coordinates.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Flat-Earth bounding box of `radius_m` metres around a point.
///
/// Valid for radii up to tens of kilometres; callers needing more must widen
/// and re-filter by exact distance.
pub fn bounding_box(lat: f64, lon: f64, radius_m: f64) -> Bounds {
    let dlat = radius_m / METERS_PER_DEG;
    let cos_lat = lat.to_radians().cos().max(0.01);
    let dlon = radius_m / (METERS_PER_DEG * cos_lat);

    Bounds {
        min_lat: (lat - dlat).max(-90.0),
        max_lat: (lat + dlat).min(90.0),
        min_lon: (lon - dlon).max(-180.0),
        max_lon: (lon + dlon).min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> &'static str {
        r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[4.0,0.0],[4.0,4.0],[0.0,4.0],[0.0,0.0]]]}"#
    }

    #[test]
    fn parse_polygon() {
        let geom = parse(unit_square()).unwrap();
        assert!(geom.contains(2.0, 2.0));
        assert!(!geom.contains(5.0, 2.0));
    }

    #[test]
    fn parse_multipolygon_any_member_matches() {
        let json = r#"{"type":"MultiPolygon","coordinates":[
            [[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]],
            [[[10.0,10.0],[11.0,10.0],[11.0,11.0],[10.0,11.0],[10.0,10.0]]]
        ]}"#;
        let geom = parse(json).unwrap();
        assert!(geom.contains(0.5, 0.5));
        assert!(geom.contains(10.5, 10.5));
        assert!(!geom.contains(5.0, 5.0));
    }

    #[test]
    fn holes_subtract() {
        let json = r#"{"type":"Polygon","coordinates":[
            [[0.0,0.0],[10.0,0.0],[10.0,10.0],[0.0,10.0],[0.0,0.0]],
            [[4.0,4.0],[6.0,4.0],[6.0,6.0],[4.0,6.0],[4.0,4.0]]
        ]}"#;
        let geom = parse(json).unwrap();
        assert!(geom.contains(1.0, 1.0));
        assert!(!geom.contains(5.0, 5.0));
    }

    #[test]
    fn rejects_unsupported_types() {
        let line = r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]}"#;
        assert!(matches!(
            parse(line),
            Err(GeometryError::Unsupported(_))
        ));

        let feature = r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]}}"#;
        assert!(matches!(
            parse(feature),
            Err(GeometryError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(matches!(parse("not json"), Err(GeometryError::Invalid(_))));
        assert!(matches!(parse(""), Err(GeometryError::Empty)));
        assert!(matches!(parse("   "), Err(GeometryError::Empty)));
    }

    #[test]
    fn haversine_symmetry_and_zero() {
        let d1 = haversine(40.7128, -74.0060, 48.8566, 2.3522);
        let d2 = haversine(48.8566, 2.3522, 40.7128, -74.0060);
        assert!((d1 - d2).abs() < 1e-6);
        assert_eq!(haversine(12.5, 33.0, 12.5, 33.0), 0.0);
    }

    #[test]
    fn haversine_known_distance() {
        // New York -> Paris, roughly 5 837 km.
        let d = haversine(40.7128, -74.0060, 48.8566, 2.3522);
        assert!((d - 5_837_000.0).abs() < 20_000.0, "got {d}");
    }

    #[test]
    fn bounding_box_contains_center() {
        let b = bounding_box(40.0, -74.0, 1_000.0);
        assert!(b.contains(40.0, -74.0));
        assert!(b.min_lat < 40.0 && b.max_lat > 40.0);
        assert!(b.min_lon < -74.0 && b.max_lon > -74.0);
    }

    #[test]
    fn bounding_box_clamped_at_poles() {
        let b = bounding_box(89.999, 0.0, 50_000.0);
        assert!(b.max_lat <= 90.0);
        let b = bounding_box(-89.999, 0.0, 50_000.0);
        assert!(b.min_lat >= -90.0);
    }

    #[test]
    fn bounds_expand_and_center() {
        let b = Bounds {
            min_lat: 10.0,
            max_lat: 20.0,
            min_lon: -10.0,
            max_lon: 10.0,
        };
        assert!(b.contains(10.0, -10.0));
        assert!(!b.contains(9.99, 0.0));
        let e = b.expand(2.0);
        assert!(e.contains(8.5, -11.5));
        assert_eq!(b.center(), (15.0, 0.0));
    }
}

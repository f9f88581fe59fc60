//! Extents and reprojection of GeoJSON data.

use super::mercator::{lng_lat_to_mercator, mercator_to_lng_lat};
use super::point::GeoPoint;
use geo_types::{Coord, Rect};
use geojson::{GeoJson, Geometry, Value};

/// Direction of a GeoJSON reprojection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reprojection {
    /// EPSG:3857 meters to EPSG:4326 degrees
    MercatorToLngLat,
    /// EPSG:4326 degrees to EPSG:3857 meters
    LngLatToMercator,
}

/// Bounding rectangle of every position in `geojson`.
///
/// Returns `None` when the document holds no positions (empty collections,
/// features without geometry).
pub fn extent_of_geojson(geojson: &GeoJson) -> Option<Rect<f64>> {
    let mut extent = ExtentBuilder::default();
    match geojson {
        GeoJson::Geometry(geometry) => visit_geometry(geometry, &mut |p| extent.add(p)),
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                visit_geometry(geometry, &mut |p| extent.add(p));
            }
        }
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                visit_geometry(geometry, &mut |p| extent.add(p));
            }
        }
    }
    extent.finish()
}

/// Bounding rectangle of a list of points, `None` if the list is empty.
pub fn extent_of_points(points: &[GeoPoint]) -> Option<Rect<f64>> {
    let mut extent = ExtentBuilder::default();
    for point in points {
        extent.add(&[point.lng, point.lat]);
    }
    extent.finish()
}

/// Rewrites every position of `geojson` in place.
pub fn reproject_geojson(geojson: &mut GeoJson, direction: Reprojection) {
    let mut convert = |position: &mut Vec<f64>| {
        if position.len() < 2 {
            return;
        }
        let [x, y] = match direction {
            Reprojection::MercatorToLngLat => {
                let p = mercator_to_lng_lat([position[0], position[1]]);
                [p.lng, p.lat]
            }
            Reprojection::LngLatToMercator => {
                lng_lat_to_mercator(GeoPoint::new(position[0], position[1]))
            }
        };
        position[0] = x;
        position[1] = y;
    };

    match geojson {
        GeoJson::Geometry(geometry) => visit_geometry_mut(geometry, &mut convert),
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry.as_mut() {
                visit_geometry_mut(geometry, &mut convert);
            }
        }
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter_mut().filter_map(|f| f.geometry.as_mut()) {
                visit_geometry_mut(geometry, &mut convert);
            }
        }
    }
}

fn visit_geometry(geometry: &Geometry, f: &mut impl FnMut(&[f64])) {
    match &geometry.value {
        Value::Point(p) => f(p),
        Value::MultiPoint(points) | Value::LineString(points) => {
            points.iter().for_each(|p| f(p));
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().for_each(|p| f(p));
        }
        Value::MultiPolygon(polygons) => {
            polygons.iter().flatten().flatten().for_each(|p| f(p));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                visit_geometry(g, f);
            }
        }
    }
}

fn visit_geometry_mut(geometry: &mut Geometry, f: &mut impl FnMut(&mut Vec<f64>)) {
    match &mut geometry.value {
        Value::Point(p) => f(p),
        Value::MultiPoint(points) | Value::LineString(points) => {
            points.iter_mut().for_each(|p| f(p));
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter_mut().flatten().for_each(|p| f(p));
        }
        Value::MultiPolygon(polygons) => {
            polygons.iter_mut().flatten().flatten().for_each(|p| f(p));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                visit_geometry_mut(g, f);
            }
        }
    }
}

struct ExtentBuilder {
    min: Coord<f64>,
    max: Coord<f64>,
    empty: bool,
}

impl Default for ExtentBuilder {
    fn default() -> Self {
        Self {
            min: Coord {
                x: f64::INFINITY,
                y: f64::INFINITY,
            },
            max: Coord {
                x: f64::NEG_INFINITY,
                y: f64::NEG_INFINITY,
            },
            empty: true,
        }
    }
}

impl ExtentBuilder {
    fn add(&mut self, position: &[f64]) {
        let [x, y] = match position {
            [x, y, ..] => [*x, *y],
            _ => return,
        };
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
        self.empty = false;
    }

    fn finish(self) -> Option<Rect<f64>> {
        if self.empty {
            None
        } else {
            Some(Rect::new(self.min, self.max))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> GeoJson {
        s.parse().unwrap()
    }

    #[test]
    fn test_extent_of_feature_collection() {
        let geojson = parse(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {},
                     "geometry": {"type": "Point", "coordinates": [10.0, -5.0]}},
                    {"type": "Feature", "properties": {},
                     "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 8.0], [0.0, 0.0]]]}},
                    {"type": "Feature", "properties": {}, "geometry": null}
                ]
            }"#,
        );

        let extent = extent_of_geojson(&geojson).unwrap();
        assert_eq!(extent.min(), Coord { x: 0.0, y: -5.0 });
        assert_eq!(extent.max(), Coord { x: 10.0, y: 8.0 });
    }

    #[test]
    fn test_extent_of_geometry_collection() {
        let geojson = parse(
            r#"{
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "MultiPolygon", "coordinates": [[[[1.0, 1.0], [2.0, 3.0], [1.0, 1.0]]]]},
                    {"type": "MultiLineString", "coordinates": [[[-7.0, 2.0], [0.0, 0.5]]]}
                ]
            }"#,
        );

        let extent = extent_of_geojson(&geojson).unwrap();
        assert_eq!(extent.min(), Coord { x: -7.0, y: 0.5 });
        assert_eq!(extent.max(), Coord { x: 2.0, y: 3.0 });
    }

    #[test]
    fn test_empty_collection_has_no_extent() {
        let geojson = parse(r#"{"type": "FeatureCollection", "features": []}"#);
        assert!(extent_of_geojson(&geojson).is_none());
        assert!(extent_of_points(&[]).is_none());
    }

    #[test]
    fn test_extent_of_points() {
        let extent = extent_of_points(&[
            GeoPoint::new(3.0, 4.0),
            GeoPoint::new(-1.0, 9.0),
            GeoPoint::new(2.0, -2.0),
        ])
        .unwrap();
        assert_eq!(extent.min(), Coord { x: -1.0, y: -2.0 });
        assert_eq!(extent.max(), Coord { x: 3.0, y: 9.0 });
    }

    #[test]
    fn test_reproject_line_string() {
        let mut geojson = parse(
            r#"{"type": "LineString", "coordinates": [[0.0, 0.0], [20037508.34, 0.0]]}"#,
        );
        reproject_geojson(&mut geojson, Reprojection::MercatorToLngLat);

        let GeoJson::Geometry(geometry) = &geojson else {
            panic!("expected a geometry");
        };
        let Value::LineString(points) = &geometry.value else {
            panic!("expected a line string");
        };
        assert!((points[1][0] - 180.0).abs() < 1e-9);
        assert!(points[1][1].abs() < 1e-9);

        reproject_geojson(&mut geojson, Reprojection::LngLatToMercator);
        let extent = extent_of_geojson(&geojson).unwrap();
        assert!((extent.max().x - 20037508.34).abs() < 1e-6);
    }
}

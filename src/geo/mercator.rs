//! Conversions between lng/lat degrees (EPSG:4326) and spherical Mercator
//! meters (EPSG:3857).

use super::point::GeoPoint;
use std::f64::consts::PI;

/// Half the equatorial circumference of the EPSG:3857 sphere, in meters.
pub const HALF_CIRCUMFERENCE: f64 = 20037508.34;

/// Converts lng/lat degrees to Mercator `[x, y]` meters.
pub fn lng_lat_to_mercator(point: GeoPoint) -> [f64; 2] {
    let x = point.lng * HALF_CIRCUMFERENCE / 180.0;
    let y = ((90.0 + point.lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    [x, y * HALF_CIRCUMFERENCE / 180.0]
}

/// Converts Mercator `[x, y]` meters back to lng/lat degrees.
pub fn mercator_to_lng_lat([x, y]: [f64; 2]) -> GeoPoint {
    let lng = x / HALF_CIRCUMFERENCE * 180.0;
    let lat = y / HALF_CIRCUMFERENCE * 180.0;
    let lat = 180.0 / PI * (2.0 * (lat * PI / 180.0).exp().atan() - PI / 2.0);
    GeoPoint::new(lng, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_origin() {
        let [x, y] = lng_lat_to_mercator(GeoPoint::new(0.0, 0.0));
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_is_half_circumference() {
        let [x, _] = lng_lat_to_mercator(GeoPoint::new(180.0, 0.0));
        assert!((x - HALF_CIRCUMFERENCE).abs() < 1e-6);
    }

    #[test]
    fn test_known_city() {
        // Beijing
        let [x, y] = lng_lat_to_mercator(GeoPoint::new(116.391, 39.907));
        assert!((x - 12_956_586.85).abs() < 0.1);
        assert!((y - 4_852_436.96).abs() < 0.1);
    }

    #[test]
    fn test_inverse() {
        let point = GeoPoint::new(-122.4194, 37.7749);
        let back = mercator_to_lng_lat(lng_lat_to_mercator(point));
        assert!((back.lng - point.lng).abs() < 1e-9);
        assert!((back.lat - point.lat).abs() < 1e-9);
    }
}

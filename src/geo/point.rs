//! Geographic and screen point primitives.

use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Screen position in pixels, relative to the map viewport's top-left corner.
pub type ScreenPoint = glam::DVec2;

/// A geographic position in degrees.
///
/// Longitude is deliberately unbounded: world-copy resolution shifts it by
/// multiples of 360° so it can exceed ±180.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Returns a copy of this point shifted east by `degrees` of longitude.
    pub fn shifted(self, degrees: f64) -> Self {
        Self::new(self.lng + degrees, self.lat)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Coord {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self::new(lng, lat)
    }
}

/// Folds a longitude into [-180, 180).
pub fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Rounds each component to the nearest pixel, with halves rounding up.
///
/// Browsers place `-2.5px` at `-2px`, so halves go toward +∞ rather than
/// away from zero as `f64::round` does.
pub fn round_px(point: ScreenPoint) -> ScreenPoint {
    ScreenPoint::new((point.x + 0.5).floor(), (point.y + 0.5).floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_keeps_latitude() {
        let p = GeoPoint::new(170.0, -33.5).shifted(-360.0);
        assert_eq!(p, GeoPoint::new(-190.0, -33.5));
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(540.0), -180.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
    }

    #[test]
    fn test_round_px_halves_go_up() {
        let p = round_px(ScreenPoint::new(-2.5, 2.5));
        assert_eq!(p, ScreenPoint::new(-2.0, 3.0));

        let p = round_px(ScreenPoint::new(10.49, -7.51));
        assert_eq!(p, ScreenPoint::new(10.0, -8.0));
    }

    #[test]
    fn test_coord_conversion() {
        let coord = Coord { x: 12.5, y: 41.9 };
        let point = GeoPoint::from(coord);
        assert_eq!(point, GeoPoint::new(12.5, 41.9));
        assert_eq!(Coord::from(point), coord);
    }
}

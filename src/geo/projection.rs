//! Camera transform and map projection.
//!
//! Converts between geographic coordinates (lng/lat) and viewport pixels.
//! The overlay code only needs the [`CameraTransform`] view of a camera;
//! [`MapProjection`] is the Web Mercator camera used by the bundled hosts.

use super::point::{wrap_longitude, GeoPoint, ScreenPoint};
use std::f64::consts::PI;

/// Tile size in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051129;

/// Zoom limits accepted by [`MapProjection::set_zoom`].
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 24.0;

/// Read-only view of the host's camera.
///
/// `project` must not wrap longitudes: a point shifted by +360° projects one
/// world width to the right, which is what makes world copies resolvable.
pub trait CameraTransform {
    /// Geographic point at the middle of the viewport.
    fn center(&self) -> GeoPoint;

    /// Viewport width in pixels.
    fn width(&self) -> f64;

    /// Viewport height in pixels.
    fn height(&self) -> f64;

    /// Whether the host draws repeated copies of the world side by side.
    fn render_world_copies(&self) -> bool;

    /// Projects a geographic point to a viewport pixel.
    fn project(&self, point: GeoPoint) -> ScreenPoint;

    /// Alias of [`CameraTransform::project`].
    fn location_point(&self, point: GeoPoint) -> ScreenPoint {
        self.project(point)
    }

    /// Returns true if `pos` lies within `[0, width] x [0, height]`.
    fn contains(&self, pos: ScreenPoint) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width() && pos.y <= self.height()
    }
}

/// Web Mercator camera with a center, zoom level and viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    /// Center of the view
    pub center: GeoPoint,
    /// Current zoom level
    pub zoom: f64,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Draw repeated world copies east and west of the primary world
    pub render_world_copies: bool,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(0.0, 0.0),
            zoom: 1.0,
            width: 800.0,
            height: 600.0,
            render_world_copies: true,
        }
    }
}

impl MapProjection {
    /// Creates a camera centered on `center` at `zoom`, sized `width` x `height`.
    pub fn new(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Self {
        let mut projection = Self {
            width,
            height,
            ..Default::default()
        };
        projection.set_zoom(zoom);
        projection.set_center(center);
        projection
    }

    /// Builder-style toggle for world copies.
    pub fn with_world_copies(mut self, enabled: bool) -> Self {
        self.render_world_copies = enabled;
        self.set_center(self.center);
        self
    }

    /// Width of one world copy in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Moves the camera. With world copies on, the longitude is folded into
    /// [-180, 180) the way a panning map keeps its center normalized.
    pub fn set_center(&mut self, center: GeoPoint) {
        let lat = center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let lng = if self.render_world_copies {
            wrap_longitude(center.lng)
        } else {
            center.lng.clamp(-180.0, 180.0)
        };
        self.center = GeoPoint::new(lng, lat);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Pans the view by a pixel delta (positive x moves the view east).
    pub fn pan_by(&mut self, delta: ScreenPoint) {
        let center_px = self.world_point(self.center) + delta;
        let center = self.world_to_geo(center_px);
        self.set_center(center);
    }

    /// Projects to absolute world pixels (origin at the north-west corner of
    /// the primary world copy).
    pub fn world_point(&self, point: GeoPoint) -> ScreenPoint {
        let world = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = (180.0 + point.lng) / 360.0 * world;
        let y_deg = 180.0 / PI * (PI / 4.0 + lat * PI / 360.0).tan().ln();
        let y = (180.0 - y_deg) / 360.0 * world;
        ScreenPoint::new(x, y)
    }

    fn world_to_geo(&self, world_px: ScreenPoint) -> GeoPoint {
        let world = self.world_size();
        let lng = world_px.x / world * 360.0 - 180.0;
        let y_deg = 180.0 - world_px.y / world * 360.0;
        let lat = 360.0 / PI * (y_deg * PI / 180.0).exp().atan() - 90.0;
        GeoPoint::new(lng, lat)
    }

    /// Converts a viewport pixel back to a geographic point.
    ///
    /// The returned longitude is not wrapped, so pixels over a world copy map
    /// to longitudes beyond ±180.
    pub fn unproject(&self, pos: ScreenPoint) -> GeoPoint {
        let origin = self.world_point(self.center) - self.half_size();
        self.world_to_geo(origin + pos)
    }

    /// Returns the visible geographic bounds as (min_lng, min_lat, max_lng, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.unproject(ScreenPoint::ZERO);
        let bottom_right = self.unproject(ScreenPoint::new(self.width, self.height));

        (
            top_left.lng.min(bottom_right.lng),
            top_left.lat.min(bottom_right.lat),
            top_left.lng.max(bottom_right.lng),
            top_left.lat.max(bottom_right.lat),
        )
    }

    fn half_size(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

impl CameraTransform for MapProjection {
    fn center(&self) -> GeoPoint {
        self.center
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn render_world_copies(&self) -> bool {
        self.render_world_copies
    }

    fn project(&self, point: GeoPoint) -> ScreenPoint {
        self.world_point(point) - self.world_point(self.center) + self.half_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_center_projects_to_viewport_middle() {
        let camera = MapProjection::new(GeoPoint::new(-98.0, 39.0), 4.0, 800.0, 600.0);
        let pos = camera.project(GeoPoint::new(-98.0, 39.0));
        assert!(approx(pos.x, 400.0));
        assert!(approx(pos.y, 300.0));
    }

    #[test]
    fn test_world_copy_is_one_world_width_away() {
        let camera = MapProjection::new(GeoPoint::new(170.0, 0.0), 2.0, 800.0, 600.0);
        let p = camera.project(GeoPoint::new(-170.0, 10.0));
        let q = camera.project(GeoPoint::new(190.0, 10.0));
        assert!(approx(q.x - p.x, camera.world_size()));
        assert!(approx(q.y, p.y));
    }

    #[test]
    fn test_unproject_roundtrip() {
        let camera = MapProjection::new(GeoPoint::new(10.0, 50.0), 6.0, 1024.0, 768.0);
        let point = GeoPoint::new(11.25, 49.5);
        let back = camera.unproject(camera.project(point));
        assert!(approx(back.lng, point.lng));
        assert!(approx(back.lat, point.lat));
    }

    #[test]
    fn test_set_center_wraps_with_world_copies() {
        let mut camera = MapProjection::default();
        camera.set_center(GeoPoint::new(190.0, 95.0));
        assert!(approx(camera.center.lng, -170.0));
        assert!(approx(camera.center.lat, MAX_LATITUDE));

        let mut camera = MapProjection::default().with_world_copies(false);
        camera.set_center(GeoPoint::new(190.0, 0.0));
        assert!(approx(camera.center.lng, 180.0));
    }

    #[test]
    fn test_pan_by_crosses_antimeridian() {
        let mut camera = MapProjection::new(GeoPoint::new(179.0, 0.0), 3.0, 800.0, 600.0);
        let degrees_per_px = 360.0 / camera.world_size();
        camera.pan_by(ScreenPoint::new(2.0 / degrees_per_px, 0.0));
        assert!(approx(camera.center.lng, -179.0));
    }

    #[test]
    fn test_contains() {
        let camera = MapProjection::default();
        assert!(camera.contains(ScreenPoint::new(0.0, 0.0)));
        assert!(camera.contains(ScreenPoint::new(800.0, 600.0)));
        assert!(!camera.contains(ScreenPoint::new(-0.1, 10.0)));
        assert!(!camera.contains(ScreenPoint::new(10.0, 600.1)));
    }

    #[test]
    fn test_visible_bounds_surround_center() {
        let camera = MapProjection::new(GeoPoint::new(-98.0, 39.0), 5.0, 800.0, 600.0);
        let (min_lng, min_lat, max_lng, max_lat) = camera.visible_bounds();
        assert!(min_lng < -98.0 && max_lng > -98.0);
        assert!(min_lat < 39.0 && max_lat > 39.0);
    }
}

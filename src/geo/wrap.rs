//! World-copy resolution for points drawn on a wrapping map.
//!
//! When the host renders repeated worlds, the same location appears every
//! 360° of longitude. [`smart_wrap`] picks the copy an overlay should follow
//! so it neither jumps across the screen while the camera moves nor drifts
//! off into a world copy nobody is looking at.

use super::point::{GeoPoint, ScreenPoint};
use super::projection::CameraTransform;

/// Upper bound on single-world steps in the correction loop. Realistic
/// inputs settle in one or two steps.
pub const MAX_WRAP_STEPS: usize = 64;

/// Returns the longitude-shifted copy of `point` that best represents it on
/// the current camera.
///
/// With a `prior` screen position, the copy one world west or east replaces
/// the unshifted point if it projects strictly closer to `prior`; the closer
/// of the two wins and ties keep the unshifted point. Afterwards the point is
/// walked back toward the camera center one world at a time until it is
/// within 180° of the center or already projects inside the viewport.
pub fn smart_wrap<C>(point: GeoPoint, prior: Option<ScreenPoint>, camera: &C) -> GeoPoint
where
    C: CameraTransform + ?Sized,
{
    let mut point = point;

    if let Some(prior) = prior {
        let delta = camera.location_point(point).distance_squared(prior);
        let mut best = delta;

        for candidate in [point.shifted(-360.0), point.shifted(360.0)] {
            let dist = camera.location_point(candidate).distance_squared(prior);
            if dist < best {
                best = dist;
                point = candidate;
            }
        }
    }

    let center_lng = camera.center().lng;
    let mut steps = 0;

    while (point.lng - center_lng).abs() > 180.0 {
        if camera.contains(camera.location_point(point)) {
            break;
        }

        if steps == MAX_WRAP_STEPS {
            log::warn!(
                "smart_wrap: longitude {} did not settle near center {} after {} steps",
                point.lng,
                center_lng,
                MAX_WRAP_STEPS
            );
            return nearest_copy(point, center_lng);
        }

        let step = if point.lng > center_lng { -360.0 } else { 360.0 };
        point = point.shifted(step);
        steps += 1;
    }

    point
}

/// Copy of `point` whose longitude lies within 180° of `center_lng`.
fn nearest_copy(point: GeoPoint, center_lng: f64) -> GeoPoint {
    let offset = (point.lng - center_lng + 180.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(center_lng + offset, point.lat)
}

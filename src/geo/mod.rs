//! Geographic primitives and coordinate conversion.
//!
//! This module provides the point types shared by the overlay code, the
//! camera projection used to place things on screen, world-copy resolution,
//! and Mercator/GeoJSON helpers.

mod extent;
mod mercator;
mod point;
mod projection;
mod wrap;

pub use extent::{extent_of_geojson, extent_of_points, reproject_geojson, Reprojection};
pub use mercator::{lng_lat_to_mercator, mercator_to_lng_lat, HALF_CIRCUMFERENCE};
pub use point::{round_px, wrap_longitude, GeoPoint, ScreenPoint};
pub use projection::{CameraTransform, MapProjection, MAX_LATITUDE, TILE_SIZE};
pub use wrap::{smart_wrap, MAX_WRAP_STEPS};

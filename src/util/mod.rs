//! Small numeric helpers.

pub mod easing;

pub use easing::{ease, lerp, UnitBezier};

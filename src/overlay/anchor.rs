//! Anchor names, their CSS alignment, and automatic anchor selection.

use super::offset::AnchorOffsets;
use crate::error::OverlayError;
use crate::geo::ScreenPoint;
use crate::host::OverlayNode;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prefix of the anchor class applied to an overlay container.
pub const ANCHOR_CLASS_PREFIX: &str = "mapboxgl-popup-anchor-";

/// Which point of the overlay's box sits on its geographic point.
///
/// `TopLeft` puts the box's top-left corner on the point, so the box hangs
/// below and to the right of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
        }
    }

    /// CSS translation that moves the overlay box so this anchor point lands
    /// on the box's origin.
    pub fn css_translate(&self) -> &'static str {
        match self {
            Anchor::Center => "translate(-50%,-50%)",
            Anchor::Top => "translate(-50%,0)",
            Anchor::Bottom => "translate(-50%,-100%)",
            Anchor::Left => "translate(0,-50%)",
            Anchor::Right => "translate(-100%,-50%)",
            Anchor::TopLeft => "translate(0,0)",
            Anchor::TopRight => "translate(-100%,0)",
            Anchor::BottomLeft => "translate(0,-100%)",
            Anchor::BottomRight => "translate(-100%,-100%)",
        }
    }

    pub fn class_name(&self) -> String {
        format!("{}{}", ANCHOR_CLASS_PREFIX, self.as_str())
    }

    fn from_components(vertical: Option<Vertical>, horizontal: Option<Horizontal>) -> Self {
        match (vertical, horizontal) {
            (None, None) => Anchor::Bottom,
            (Some(Vertical::Top), None) => Anchor::Top,
            (Some(Vertical::Bottom), None) => Anchor::Bottom,
            (None, Some(Horizontal::Left)) => Anchor::Left,
            (None, Some(Horizontal::Right)) => Anchor::Right,
            (Some(Vertical::Top), Some(Horizontal::Left)) => Anchor::TopLeft,
            (Some(Vertical::Top), Some(Horizontal::Right)) => Anchor::TopRight,
            (Some(Vertical::Bottom), Some(Horizontal::Left)) => Anchor::BottomLeft,
            (Some(Vertical::Bottom), Some(Horizontal::Right)) => Anchor::BottomRight,
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| OverlayError::InvalidAnchor(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    Left,
    Right,
}

/// Picks an anchor that keeps an overlay of `size` inside `viewport` when
/// placed at `pos`.
///
/// - `top` when the box would poke out above the viewport if it sat above
///   the point (after the `bottom` offset), `bottom` when the point is within
///   one box height of the bottom edge.
/// - `left` when the point is within half a box width of the left edge,
///   `right` likewise for the right edge.
/// - `bottom` when neither applies.
///
/// A box that has not been laid out yet reports a zero size; every test then
/// fails and the result is `bottom`.
pub fn auto_anchor(
    pos: ScreenPoint,
    size: DVec2,
    viewport: DVec2,
    offsets: &AnchorOffsets,
) -> Anchor {
    let vertical = if pos.y + offsets.get(Anchor::Bottom).y < size.y {
        Some(Vertical::Top)
    } else if pos.y > viewport.y - size.y {
        Some(Vertical::Bottom)
    } else {
        None
    };

    let horizontal = if pos.x < size.x / 2.0 {
        Some(Horizontal::Left)
    } else if pos.x > viewport.x - size.x / 2.0 {
        Some(Horizontal::Right)
    } else {
        None
    };

    Anchor::from_components(vertical, horizontal)
}

/// Leaves exactly one anchor class on `node`.
pub fn apply_anchor_class<N: OverlayNode>(node: &N, anchor: Anchor) {
    for other in Anchor::ALL {
        node.remove_class(&other.class_name());
    }
    node.add_class(&anchor.class_name());
}

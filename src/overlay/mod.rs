//! Map overlays anchored to geographic points.
//!
//! - `anchor`: the nine anchors, their CSS alignment and automatic selection
//! - `offset`: offset configuration and its per-anchor table
//! - `options`: overlay configuration
//! - `label`: the overlay itself

mod anchor;
mod label;
mod offset;
mod options;

pub use anchor::{apply_anchor_class, auto_anchor, Anchor, ANCHOR_CLASS_PREFIX};
pub use label::{
    AnchoredOverlay, OverlayEventKind, CLOSE_BUTTON_CLASS, CONTAINER_CLASS, DEFAULT_CONTENT_CLASS,
    TIP_CLASS,
};
pub use offset::{normalize_offset, AnchorOffsets, OffsetSpec};
pub use options::OverlayOptions;

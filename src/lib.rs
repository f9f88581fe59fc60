#![warn(clippy::all)]

//! Geo Overlay - map overlays pinned to geographic points.
//!
//! An [`AnchoredOverlay`] keeps a DOM element positioned over a point on a
//! Web Mercator map. It follows the point across the antimeridian when the
//! map renders repeated world copies, picks an anchor that keeps the element
//! on screen, and tears itself down cleanly when detached.
//!
//! The map itself is abstracted behind [`HostSurface`]: [`MemoryHost`] runs
//! natively and in tests, `WebHost` drives real DOM nodes on WASM.

pub mod error;
pub mod geo;
pub mod host;
pub mod overlay;
pub mod util;

pub use error::{OverlayError, Result};
pub use geo::{smart_wrap, CameraTransform, GeoPoint, MapProjection, ScreenPoint};
pub use host::{
    Document, Evented, HostSurface, MapEvent, MapEventKind, MemoryDocument, MemoryHost,
    MemoryNode, OverlayNode, SubscriptionId,
};
#[cfg(target_arch = "wasm32")]
pub use host::{WebDocument, WebHost, WebNode};
pub use overlay::{AnchoredOverlay, Anchor, OffsetSpec, OverlayEventKind, OverlayOptions};

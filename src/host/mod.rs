//! Host surface abstraction.
//!
//! An overlay never talks to a map engine or a browser directly. It is handed
//! a [`HostSurface`] that can project points, create and attach nodes, and
//! deliver view-change notifications. On WASM targets [`WebHost`] drives real
//! DOM nodes; [`MemoryHost`] keeps everything in memory and is what native
//! builds and tests use.

pub mod events;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use events::{Evented, SubscriptionId};
pub use memory::{MemoryDocument, MemoryHost, MemoryNode, NodeKind};
#[cfg(target_arch = "wasm32")]
pub use web::{WebDocument, WebHost, WebNode};

use crate::geo::{CameraTransform, ScreenPoint};

/// Notifications a host delivers to overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// The camera changed (pan, zoom, resize)
    Move,
    /// The map surface was clicked
    Click,
}

/// Payload of a host notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEvent {
    pub kind: MapEventKind,
    /// Pointer position for clicks
    pub point: Option<ScreenPoint>,
}

impl MapEvent {
    pub fn moved() -> Self {
        Self {
            kind: MapEventKind::Move,
            point: None,
        }
    }

    pub fn click(point: ScreenPoint) -> Self {
        Self {
            kind: MapEventKind::Click,
            point: Some(point),
        }
    }
}

pub type MapListener = Box<dyn FnMut(&MapEvent)>;

/// Handle to a node in the host's document.
///
/// Clones refer to the same node.
pub trait OverlayNode: Clone + 'static {
    /// Appends `child`, detaching it from any previous parent first. Appending
    /// a fragment moves the fragment's children instead.
    fn append_child(&self, child: &Self);

    /// Detaches this node from its parent. No-op if it has none.
    fn remove(&self);

    /// Whether the node currently has a parent.
    fn is_attached(&self) -> bool;

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Sets the CSS `transform` property.
    fn set_transform(&self, value: &str);

    fn set_attribute(&self, name: &str, value: &str);

    /// Replaces the node's children with a single text node.
    fn set_text(&self, text: &str);

    /// Laid-out size of the node in pixels (`offsetWidth`, `offsetHeight`).
    fn offset_size(&self) -> glam::DVec2;

    fn add_click_listener(&self, listener: Box<dyn FnMut()>);

    /// Drops every listener added with `add_click_listener`.
    fn clear_click_listeners(&self);
}

/// Factory for nodes, standing in for the browser `document`.
pub trait Document: 'static {
    type Node: OverlayNode;

    fn create_element(&self, tag: &str, class_name: Option<&str>) -> Self::Node;

    fn create_text(&self, text: &str) -> Self::Node;

    /// Parses markup into a fragment node.
    fn parse_html(&self, html: &str) -> Self::Node;
}

/// Node type produced by a host's document.
pub type NodeOf<H> = <<H as HostSurface>::Document as Document>::Node;

/// Capabilities an overlay needs from the map it is attached to.
pub trait HostSurface: 'static {
    type Document: Document;
    type Camera: CameraTransform;

    /// Snapshot of the current camera.
    fn transform(&self) -> Self::Camera;

    /// Node that overlay containers are appended to.
    fn container(&self) -> NodeOf<Self>;

    fn on(&self, kind: MapEventKind, listener: MapListener) -> SubscriptionId;

    fn off(&self, id: SubscriptionId) -> bool;
}

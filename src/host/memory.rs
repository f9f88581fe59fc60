//! In-memory host surface.
//!
//! Models just enough of a document (tags, classes, attributes, transform,
//! text, parent/child links, layout size, click listeners) to drive overlays
//! without a browser. Native builds and the test suite run against it.

use super::events::{Evented, SubscriptionId};
use super::{Document, HostSurface, MapEvent, MapEventKind, MapListener, OverlayNode};
use crate::geo::{MapProjection, ScreenPoint};
use glam::DVec2;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(String),
    Text(String),
    /// Unparsed markup produced by [`Document::parse_html`]
    Markup(String),
    Fragment,
}

#[derive(Default)]
struct NodeData {
    kind: Option<NodeKind>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    transform: Option<String>,
    children: Vec<MemoryNode>,
    parent: Weak<RefCell<NodeData>>,
    size: DVec2,
    click_listeners: Vec<Box<dyn FnMut()>>,
}

/// Node of the in-memory document.
#[derive(Clone, Default)]
pub struct MemoryNode(Rc<RefCell<NodeData>>);

impl std::fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("MemoryNode")
            .field("kind", &data.kind)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .finish()
    }
}

impl MemoryNode {
    fn with_kind(kind: NodeKind) -> Self {
        let node = Self::default();
        node.0.borrow_mut().kind = Some(kind);
        node
    }

    pub fn element(tag: &str) -> Self {
        Self::with_kind(NodeKind::Element(tag.to_string()))
    }

    pub fn text(text: &str) -> Self {
        Self::with_kind(NodeKind::Text(text.to_string()))
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind.clone().unwrap_or(NodeKind::Fragment)
    }

    /// Tag name for elements, `None` for text, markup and fragments.
    pub fn tag(&self) -> Option<String> {
        match self.kind() {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn same_node(&self, other: &MemoryNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn parent(&self) -> Option<MemoryNode> {
        self.0.borrow().parent.upgrade().map(MemoryNode)
    }

    pub fn children(&self) -> Vec<MemoryNode> {
        self.0.borrow().children.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn transform(&self) -> Option<String> {
        self.0.borrow().transform.clone()
    }

    /// Concatenated text and markup of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = match self.kind() {
            NodeKind::Text(text) | NodeKind::Markup(text) => text,
            _ => String::new(),
        };
        for child in self.children() {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Descendants (not including this node) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<MemoryNode> {
        let mut found = Vec::new();
        for child in self.children() {
            if child.has_class(class) {
                found.push(child.clone());
            }
            found.extend(child.find_by_class(class));
        }
        found
    }

    /// Sets the size reported by [`OverlayNode::offset_size`].
    pub fn set_size(&self, width: f64, height: f64) {
        self.0.borrow_mut().size = DVec2::new(width, height);
    }

    pub fn click_listener_count(&self) -> usize {
        self.0.borrow().click_listeners.len()
    }

    /// Runs the node's click listeners.
    pub fn click(&self) {
        let mut listeners = std::mem::take(&mut self.0.borrow_mut().click_listeners);
        for listener in listeners.iter_mut() {
            listener();
        }
        let mut data = self.0.borrow_mut();
        listeners.append(&mut data.click_listeners);
        data.click_listeners = listeners;
    }

    fn detach_child(&self, child: &MemoryNode) {
        self.0
            .borrow_mut()
            .children
            .retain(|c| !c.same_node(child));
    }
}

impl OverlayNode for MemoryNode {
    fn append_child(&self, child: &Self) {
        if child.kind() == NodeKind::Fragment {
            for grandchild in child.children() {
                self.append_child(&grandchild);
            }
            return;
        }

        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.detach_child(self);
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    fn add_class(&self, class: &str) {
        let mut data = self.0.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_transform(&self, value: &str) {
        self.0.borrow_mut().transform = Some(value.to_string());
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&self, text: &str) {
        for child in self.children() {
            child.remove();
        }
        self.append_child(&MemoryNode::text(text));
    }

    fn offset_size(&self) -> DVec2 {
        self.0.borrow().size
    }

    fn add_click_listener(&self, listener: Box<dyn FnMut()>) {
        self.0.borrow_mut().click_listeners.push(listener);
    }

    fn clear_click_listeners(&self) {
        self.0.borrow_mut().click_listeners.clear();
    }
}

/// Creates [`MemoryNode`]s.
#[derive(Debug, Default)]
pub struct MemoryDocument;

impl Document for MemoryDocument {
    type Node = MemoryNode;

    fn create_element(&self, tag: &str, class_name: Option<&str>) -> MemoryNode {
        let node = MemoryNode::element(tag);
        if let Some(class_name) = class_name {
            for class in class_name.split_whitespace() {
                node.add_class(class);
            }
        }
        node
    }

    fn create_text(&self, text: &str) -> MemoryNode {
        MemoryNode::text(text)
    }

    fn parse_html(&self, html: &str) -> MemoryNode {
        let fragment = MemoryNode::with_kind(NodeKind::Fragment);
        fragment.append_child(&MemoryNode::with_kind(NodeKind::Markup(html.to_string())));
        fragment
    }
}

/// Host surface backed by a [`MapProjection`] and an in-memory document.
#[derive(Debug)]
pub struct MemoryHost {
    camera: RefCell<MapProjection>,
    document: Rc<MemoryDocument>,
    root: MemoryNode,
    events: Evented<MapEventKind, MapEvent>,
}

impl MemoryHost {
    pub fn new(camera: MapProjection) -> Self {
        let document = Rc::new(MemoryDocument);
        let root = document.create_element("div", Some("map-container"));
        Self {
            camera: RefCell::new(camera),
            document,
            root,
            events: Evented::new(),
        }
    }

    pub fn document(&self) -> Rc<MemoryDocument> {
        Rc::clone(&self.document)
    }

    pub fn camera(&self) -> MapProjection {
        self.camera.borrow().clone()
    }

    /// Replaces the camera and notifies `Move` listeners.
    pub fn set_camera(&self, camera: MapProjection) {
        *self.camera.borrow_mut() = camera;
        self.fire_move();
    }

    /// Mutates the camera in place and notifies `Move` listeners.
    pub fn update_camera(&self, f: impl FnOnce(&mut MapProjection)) {
        f(&mut self.camera.borrow_mut());
        self.fire_move();
    }

    pub fn fire_move(&self) {
        self.events.emit(MapEventKind::Move, &MapEvent::moved());
    }

    pub fn click(&self, point: ScreenPoint) {
        self.events
            .emit(MapEventKind::Click, &MapEvent::click(point));
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.events.listener_count(kind)
    }
}

impl HostSurface for MemoryHost {
    type Document = MemoryDocument;
    type Camera = MapProjection;

    fn transform(&self) -> MapProjection {
        self.camera()
    }

    fn container(&self) -> MemoryNode {
        self.root.clone()
    }

    fn on(&self, kind: MapEventKind, listener: MapListener) -> SubscriptionId {
        self.events.on(kind, listener)
    }

    fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }
}

//! Browser host surface backed by `web-sys`.
//!
//! The embedding page owns the map engine. It hands over the container
//! element, keeps the camera in sync through [`WebHost::set_camera`] and
//! forwards map clicks through [`WebHost::click`].

use super::events::{Evented, SubscriptionId};
use super::{Document, HostSurface, MapEvent, MapEventKind, MapListener, OverlayNode};
use crate::geo::{MapProjection, ScreenPoint};
use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

type ClickClosure = Closure<dyn FnMut(web_sys::Event)>;

/// Handle to a DOM node.
///
/// Click closures registered through this handle are owned by it (and its
/// clones) until `clear_click_listeners` unregisters and drops them.
#[derive(Clone)]
pub struct WebNode {
    node: web_sys::Node,
    listeners: Rc<RefCell<Vec<ClickClosure>>>,
}

impl WebNode {
    pub fn new(node: web_sys::Node) -> Self {
        Self {
            node,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn as_node(&self) -> &web_sys::Node {
        &self.node
    }

    fn element(&self) -> Option<&Element> {
        self.node.dyn_ref::<Element>()
    }

    fn html_element(&self) -> Option<&HtmlElement> {
        self.node.dyn_ref::<HtmlElement>()
    }
}

impl std::fmt::Debug for WebNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebNode")
            .field("node", &self.node)
            .field("click_listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl PartialEq for WebNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl From<HtmlElement> for WebNode {
    fn from(element: HtmlElement) -> Self {
        Self::new(element.into())
    }
}

impl OverlayNode for WebNode {
    fn append_child(&self, child: &Self) {
        if let Err(e) = self.node.append_child(&child.node) {
            log::warn!("appendChild failed: {:?}", e);
        }
    }

    fn remove(&self) {
        if let Some(parent) = self.node.parent_node() {
            if let Err(e) = parent.remove_child(&self.node) {
                log::warn!("removeChild failed: {:?}", e);
            }
        }
    }

    fn is_attached(&self) -> bool {
        self.node.parent_node().is_some()
    }

    fn add_class(&self, class: &str) {
        if let Some(element) = self.element() {
            if let Err(e) = element.class_list().add_1(class) {
                log::warn!("classList.add({:?}) failed: {:?}", class, e);
            }
        }
    }

    fn remove_class(&self, class: &str) {
        if let Some(element) = self.element() {
            if let Err(e) = element.class_list().remove_1(class) {
                log::warn!("classList.remove({:?}) failed: {:?}", class, e);
            }
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element()
            .map(|element| element.class_list().contains(class))
            .unwrap_or(false)
    }

    fn set_transform(&self, value: &str) {
        if let Some(element) = self.html_element() {
            if let Err(e) = element.style().set_property("transform", value) {
                log::warn!("style.transform = {:?} failed: {:?}", value, e);
            }
        }
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(element) = self.element() {
            if let Err(e) = element.set_attribute(name, value) {
                log::warn!("setAttribute({:?}) failed: {:?}", name, e);
            }
        }
    }

    fn set_text(&self, text: &str) {
        self.node.set_text_content(Some(text));
    }

    fn offset_size(&self) -> DVec2 {
        self.html_element()
            .map(|element| {
                DVec2::new(element.offset_width() as f64, element.offset_height() as f64)
            })
            .unwrap_or(DVec2::ZERO)
    }

    fn add_click_listener(&self, mut listener: Box<dyn FnMut()>) {
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| listener())
            as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = self
            .node
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        {
            log::warn!("addEventListener failed: {:?}", e);
            return;
        }
        self.listeners.borrow_mut().push(closure);
    }

    fn clear_click_listeners(&self) {
        for closure in self.listeners.borrow_mut().drain(..) {
            if let Err(e) = self
                .node
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            {
                log::warn!("removeEventListener failed: {:?}", e);
            }
        }
    }
}

/// Wraps the page's `document`.
#[derive(Debug, Clone)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    /// The current window's document, if running in a window.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self)
    }

    fn fragment(&self) -> WebNode {
        WebNode::new(self.0.create_document_fragment().into())
    }
}

impl Document for WebDocument {
    type Node = WebNode;

    fn create_element(&self, tag: &str, class_name: Option<&str>) -> WebNode {
        match self.0.create_element(tag) {
            Ok(element) => {
                if let Some(class_name) = class_name {
                    element.set_class_name(class_name);
                }
                WebNode::new(element.into())
            }
            Err(e) => {
                log::error!("createElement({:?}) failed: {:?}", tag, e);
                self.fragment()
            }
        }
    }

    fn create_text(&self, text: &str) -> WebNode {
        WebNode::new(self.0.create_text_node(text).into())
    }

    fn parse_html(&self, html: &str) -> WebNode {
        let fragment = self.fragment();
        let scratch = match self.0.create_element("div") {
            Ok(element) => element,
            Err(e) => {
                log::error!("createElement(\"div\") failed: {:?}", e);
                return fragment;
            }
        };
        scratch.set_inner_html(html);
        while let Some(child) = scratch.first_child() {
            if fragment.node.append_child(&child).is_err() {
                break;
            }
        }
        fragment
    }
}

/// Host surface over a map container element.
#[derive(Debug)]
pub struct WebHost {
    container: WebNode,
    document: Rc<WebDocument>,
    camera: RefCell<MapProjection>,
    events: Evented<MapEventKind, MapEvent>,
}

impl WebHost {
    pub fn new(document: WebDocument, container: HtmlElement, camera: MapProjection) -> Self {
        Self {
            container: container.into(),
            document: Rc::new(document),
            camera: RefCell::new(camera),
            events: Evented::new(),
        }
    }

    pub fn document(&self) -> Rc<WebDocument> {
        Rc::clone(&self.document)
    }

    /// Replaces the camera and notifies `Move` listeners. Call after every
    /// render frame in which the map's view changed.
    pub fn set_camera(&self, camera: MapProjection) {
        *self.camera.borrow_mut() = camera;
        self.events.emit(MapEventKind::Move, &MapEvent::moved());
    }

    /// Forwards a click on the map surface.
    pub fn click(&self, point: ScreenPoint) {
        self.events
            .emit(MapEventKind::Click, &MapEvent::click(point));
    }
}

impl HostSurface for WebHost {
    type Document = WebDocument;
    type Camera = MapProjection;

    fn transform(&self) -> MapProjection {
        self.camera.borrow().clone()
    }

    fn container(&self) -> WebNode {
        self.container.clone()
    }

    fn on(&self, kind: MapEventKind, listener: MapListener) -> SubscriptionId {
        self.events.on(kind, listener)
    }

    fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }
}

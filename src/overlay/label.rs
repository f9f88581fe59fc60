//! Anchored overlay: a DOM element pinned to a geographic point.
//!
//! The overlay owns a container node under the host's container. On every
//! camera change it re-resolves which world copy of its point to show,
//! projects it, picks an anchor and writes the container's CSS transform.
//!
//! State lives behind `Rc<RefCell<..>>` so the handle can be cloned into host
//! callbacks. Callbacks hold weak references; dropping every handle turns
//! them into no-ops.

use super::anchor::{apply_anchor_class, auto_anchor, Anchor};
use super::offset::{normalize_offset, AnchorOffsets, OffsetSpec};
use super::options::OverlayOptions;
use crate::error::Result;
use crate::geo::{round_px, smart_wrap, CameraTransform, GeoPoint, ScreenPoint};
use crate::host::{
    Document, Evented, HostSurface, MapEvent, MapEventKind, NodeOf, OverlayNode, SubscriptionId,
};
use glam::DVec2;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Class of the overlay container.
pub const CONTAINER_CLASS: &str = "mapboxgl-label";
/// Class of the optional tip element.
pub const TIP_CLASS: &str = "mapboxgl-label-tip";
/// Class of the optional close button.
pub const CLOSE_BUTTON_CLASS: &str = "mapboxgl-label-close-button";
/// Content class used when no class name is configured.
pub const DEFAULT_CONTENT_CLASS: &str = "mapboxgl-label-content";

/// Lifecycle notifications emitted by an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEventKind {
    /// Emitted after the overlay is attached to a host
    Open,
    /// Emitted after an attached overlay is detached
    Close,
}

type OverlayEvents<H> = Evented<OverlayEventKind, AnchoredOverlay<H>>;

struct State<H: HostSurface> {
    document: Rc<H::Document>,
    options: OverlayOptions,
    offsets: AnchorOffsets,

    host: Option<Rc<H>>,
    subscriptions: Vec<SubscriptionId>,

    lng_lat: Option<GeoPoint>,
    pos: Option<ScreenPoint>,
    anchor: Option<Anchor>,

    container: Option<NodeOf<H>>,
    content: Option<NodeOf<H>>,
    close_button: Option<NodeOf<H>>,
    dom_content: Option<NodeOf<H>>,
}

/// Handle to an overlay. Clones share the same overlay.
pub struct AnchoredOverlay<H: HostSurface> {
    state: Rc<RefCell<State<H>>>,
    events: Rc<OverlayEvents<H>>,
}

impl<H: HostSurface> Clone for AnchoredOverlay<H> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            events: Rc::clone(&self.events),
        }
    }
}

impl<H: HostSurface> std::fmt::Debug for AnchoredOverlay<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("AnchoredOverlay")
                .field("id", &state.options.id)
                .field("open", &state.host.is_some())
                .field("lng_lat", &state.lng_lat)
                .field("pos", &state.pos)
                .field("anchor", &state.anchor)
                .finish(),
            Err(_) => f.write_str("AnchoredOverlay { <busy> }"),
        }
    }
}

struct WeakOverlay<H: HostSurface> {
    state: Weak<RefCell<State<H>>>,
    events: Weak<OverlayEvents<H>>,
}

impl<H: HostSurface> WeakOverlay<H> {
    fn upgrade(&self) -> Option<AnchoredOverlay<H>> {
        Some(AnchoredOverlay {
            state: self.state.upgrade()?,
            events: self.events.upgrade()?,
        })
    }
}

impl<H: HostSurface> AnchoredOverlay<H> {
    /// Creates a detached overlay with default options.
    ///
    /// `document` creates the overlay's nodes; it must belong to the same
    /// document as any host the overlay is later attached to.
    pub fn new(document: Rc<H::Document>) -> Self {
        Self::from_parts(document, OverlayOptions::default(), AnchorOffsets::default())
    }

    /// Creates a detached overlay, validating the offset configuration.
    pub fn with_options(document: Rc<H::Document>, options: OverlayOptions) -> Result<Self> {
        let offsets = options.offsets()?;
        Ok(Self::from_parts(document, options, offsets))
    }

    fn from_parts(
        document: Rc<H::Document>,
        options: OverlayOptions,
        offsets: AnchorOffsets,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                document,
                options,
                offsets,
                host: None,
                subscriptions: Vec::new(),
                lng_lat: None,
                pos: None,
                anchor: None,
                container: None,
                content: None,
                close_button: None,
                dom_content: None,
            })),
            events: Rc::new(Evented::new()),
        }
    }

    fn downgrade(&self) -> WeakOverlay<H> {
        WeakOverlay {
            state: Rc::downgrade(&self.state),
            events: Rc::downgrade(&self.events),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Attaches the overlay to `host`, subscribes to its notifications and
    /// places the overlay. Emits [`OverlayEventKind::Open`].
    ///
    /// Attaching while attached moves the overlay: its nodes leave the
    /// previous host and that host's subscriptions are released, without a
    /// `Close`.
    pub fn add_to(&self, host: Rc<H>) -> &Self {
        if self.release_host() {
            self.remove_nodes();
        }

        let mut subscriptions = Vec::new();
        let weak = self.downgrade();
        subscriptions.push(host.on(
            MapEventKind::Move,
            Box::new(move |_: &MapEvent| {
                if let Some(overlay) = weak.upgrade() {
                    overlay.update();
                }
            }),
        ));

        let close_on_click = self.state.borrow().options.close_on_click;
        if close_on_click {
            let weak = self.downgrade();
            subscriptions.push(host.on(
                MapEventKind::Click,
                Box::new(move |_: &MapEvent| {
                    if let Some(overlay) = weak.upgrade() {
                        overlay.remove();
                    }
                }),
            ));
        }

        {
            let mut state = self.state.borrow_mut();
            state.host = Some(host);
            state.subscriptions = subscriptions;
        }
        log::debug!("Overlay {:?} attached", self.id());

        self.update();
        self.events.emit(OverlayEventKind::Open, self);
        self
    }

    /// Detaches the overlay: removes its nodes and releases host
    /// subscriptions. Emits [`OverlayEventKind::Close`] if it was attached.
    ///
    /// Safe to call any number of times.
    pub fn remove(&self) -> &Self {
        self.remove_nodes();
        if self.release_host() {
            log::debug!("Overlay {:?} detached", self.id());
            self.events.emit(OverlayEventKind::Close, self);
        }
        self
    }

    /// Takes the content out of the container and the container out of the
    /// host. The content node is kept for the next attach.
    fn remove_nodes(&self) {
        let (content, container) = {
            let mut state = self.state.borrow_mut();
            (state.content.clone(), state.container.take())
        };
        if let Some(content) = content {
            content.remove();
        }
        if let Some(container) = container {
            container.remove();
        }
    }

    /// Unsubscribes from the current host, if any. Returns whether there was
    /// one.
    fn release_host(&self) -> bool {
        let (host, subscriptions) = {
            let mut state = self.state.borrow_mut();
            (state.host.take(), std::mem::take(&mut state.subscriptions))
        };
        match host {
            Some(host) => {
                for id in subscriptions {
                    host.off(id);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().host.is_some()
    }

    // ========================================================================
    // Position
    // ========================================================================

    /// Sets the geographic point. The previous screen position is discarded,
    /// so the next placement does not try to stay near it.
    pub fn set_lng_lat(&self, lng_lat: impl Into<GeoPoint>) -> &Self {
        {
            let mut state = self.state.borrow_mut();
            state.lng_lat = Some(lng_lat.into());
            state.pos = None;
        }
        self.update();
        self
    }

    /// Current point. After a placement this is the world copy on screen,
    /// which may differ from the point passed in by multiples of 360°.
    pub fn lng_lat(&self) -> Option<GeoPoint> {
        self.state.borrow().lng_lat
    }

    /// Last projected screen position, before offset and rounding.
    pub fn pos(&self) -> Option<ScreenPoint> {
        self.state.borrow().pos
    }

    /// Anchor applied by the last placement.
    pub fn anchor(&self) -> Option<Anchor> {
        self.state.borrow().anchor
    }

    /// Recomputes placement. Does nothing until the overlay is attached and
    /// has both a point and content.
    pub fn update(&self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.update(),
            Err(_) => log::warn!("Overlay update re-entered during placement; skipped"),
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replaces the content with a text node.
    pub fn set_text(&self, text: &str) -> &Self {
        let node = self.state.borrow().document.create_text(text);
        self.set_content(node)
    }

    /// Replaces the content with parsed markup.
    pub fn set_html(&self, html: &str) -> &Self {
        let node = self.state.borrow().document.parse_html(html);
        self.set_content(node)
    }

    /// Replaces the content with `node`, wrapped in a fresh content element.
    pub fn set_content(&self, node: NodeOf<H>) -> &Self {
        let weak = self.downgrade();
        {
            let mut state = self.state.borrow_mut();
            let content = state.create_content(weak);
            content.append_child(&node);
            state.dom_content = Some(node);
        }
        self.update();
        self
    }

    /// Node last passed to [`set_content`](Self::set_content), or created by
    /// `set_text`/`set_html`.
    pub fn dom_content(&self) -> Option<NodeOf<H>> {
        self.state.borrow().dom_content.clone()
    }

    /// Container node, once it has been created by a placement.
    pub fn container(&self) -> Option<NodeOf<H>> {
        self.state.borrow().container.clone()
    }

    // ========================================================================
    // Options
    // ========================================================================

    pub fn options(&self) -> OverlayOptions {
        self.state.borrow().options.clone()
    }

    /// Reads an option by dot-separated path.
    pub fn prop(&self, path: &str) -> Option<Value> {
        self.state.borrow().options.get(path)
    }

    /// Writes an option by dot-separated path and re-places the overlay.
    ///
    /// On error the previous options stay in effect.
    pub fn set_prop(&self, path: &str, value: Value) -> Result<&Self> {
        {
            let mut state = self.state.borrow_mut();
            let mut options = state.options.clone();
            options.set(path, value)?;
            state.offsets = options.offsets()?;
            state.options = options;
        }
        self.update();
        Ok(self)
    }

    /// Replaces the offset configuration and re-places the overlay.
    pub fn set_offset(&self, offset: Option<OffsetSpec>) -> Result<&Self> {
        {
            let mut state = self.state.borrow_mut();
            state.offsets = normalize_offset(offset.as_ref())?;
            state.options.offset = offset;
        }
        self.update();
        Ok(self)
    }

    /// Fixes the anchor, or restores automatic selection with `None`.
    pub fn set_anchor(&self, anchor: Option<Anchor>) -> &Self {
        self.state.borrow_mut().options.anchor = anchor;
        self.update();
        self
    }

    /// Sets the overlay id. Empty ids are ignored.
    pub fn set_id(&self, id: &str) -> &Self {
        if !id.is_empty() {
            self.state.borrow_mut().options.id = Some(id.to_string());
        }
        self
    }

    pub fn id(&self) -> Option<String> {
        self.state.borrow().options.id.clone()
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn on(
        &self,
        kind: OverlayEventKind,
        listener: impl FnMut(&AnchoredOverlay<H>) + 'static,
    ) -> SubscriptionId {
        self.events.on(kind, listener)
    }

    pub fn once(
        &self,
        kind: OverlayEventKind,
        listener: impl FnMut(&AnchoredOverlay<H>) + 'static,
    ) -> SubscriptionId {
        self.events.once(kind, listener)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }
}

impl<H: HostSurface> State<H> {
    /// Builds a new content element, replacing the old one in the container
    /// if there is one.
    fn create_content(&mut self, overlay: WeakOverlay<H>) -> NodeOf<H> {
        if let Some(old) = self.content.take() {
            old.remove();
        }
        if let Some(button) = self.close_button.take() {
            button.clear_click_listeners();
        }

        let class_name = self.options.class_name.trim();
        let content_class = if class_name.is_empty() {
            DEFAULT_CONTENT_CLASS.to_string()
        } else {
            format!("{}-content", class_name)
        };
        let content = self.document.create_element("div", Some(content_class.as_str()));

        if self.options.close_button {
            let button = self
                .document
                .create_element("button", Some(CLOSE_BUTTON_CLASS));
            button.set_attribute("type", "button");
            button.set_attribute("aria-label", "Close popup");
            button.set_text("\u{d7}");
            button.add_click_listener(Box::new(move || {
                if let Some(overlay) = overlay.upgrade() {
                    overlay.remove();
                }
            }));
            content.append_child(&button);
            self.close_button = Some(button);
        }

        if let Some(container) = &self.container {
            container.append_child(&content);
        }
        self.content = Some(content.clone());
        content
    }

    fn ensure_container(&mut self, host: &H, content: &NodeOf<H>) -> NodeOf<H> {
        if let Some(container) = &self.container {
            return container.clone();
        }

        let container = self
            .document
            .create_element("div", Some(CONTAINER_CLASS));
        host.container().append_child(&container);
        if self.options.show_tip {
            let tip = self.document.create_element("div", Some(TIP_CLASS));
            container.append_child(&tip);
        }
        container.append_child(content);
        for class in self.options.class_name.split_whitespace() {
            container.add_class(class);
        }

        self.container = Some(container.clone());
        container
    }

    fn update(&mut self) {
        let (Some(host), Some(lng_lat), Some(content)) =
            (self.host.clone(), self.lng_lat, self.content.clone())
        else {
            log::trace!("Overlay placement skipped: not attached or incomplete");
            return;
        };

        let container = self.ensure_container(&host, &content);
        let camera = host.transform();

        let lng_lat = if camera.render_world_copies() {
            smart_wrap(lng_lat, self.pos, &camera)
        } else {
            lng_lat
        };
        let pos = camera.project(lng_lat);
        self.lng_lat = Some(lng_lat);
        self.pos = Some(pos);

        let anchor = self.options.anchor.unwrap_or_else(|| {
            auto_anchor(
                pos,
                container.offset_size(),
                DVec2::new(camera.width(), camera.height()),
                &self.offsets,
            )
        });
        let placed = round_px(pos + self.offsets[anchor]);

        container.set_transform(&format!(
            "{} translate({}px,{}px)",
            anchor.css_translate(),
            placed.x,
            placed.y
        ));
        apply_anchor_class(&container, anchor);
        self.anchor = Some(anchor);
    }
}

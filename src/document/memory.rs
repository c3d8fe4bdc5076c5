//! In-memory element tree
//!
//! Arena of rectangles with tags, classes and optional link targets. Hit
//! testing walks the tree in paint order, so later siblings and children win.
//! Dispatched events and opened URLs are recorded for inspection.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{DocumentHost, Marker};
use crate::cursor::SplatterTrigger;
use crate::input::{Point, PointerEvent, Viewport};

/// Document loading errors
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Layout file could not be read
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    /// Layout file is not valid JSON
    #[error("Failed to parse layout: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Element identity within a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Axis-aligned rectangle in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point lies inside (right and bottom edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// CSS class names the markers map to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNames {
    /// Marks an element as clickable
    pub interactive: String,
    /// Applied while hovering
    pub hovering: String,
    /// Applied briefly after an action
    pub activated: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            interactive: "clickable".to_string(),
            hovering: "hovering".to_string(),
            activated: "active".to_string(),
        }
    }
}

/// One element in the tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    /// Optional name for lookup
    pub name: Option<String>,
    /// Class list
    pub classes: BTreeSet<String>,
    /// Bounding box
    pub rect: Rect,
    /// Link destination for anchors
    pub href: Option<String>,
    /// Participates in hit-testing
    pub pointer_events: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    /// Element with a tag and bounds
    pub fn new(tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            name: None,
            classes: BTreeSet::new(),
            rect,
            href: None,
            pointer_events: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Set a lookup name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a link destination
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Exclude from hit-testing (overlay elements)
    pub fn without_pointer_events(mut self) -> Self {
        self.pointer_events = false;
        self
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Serialized layout description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Tag name
    pub tag: String,
    /// Optional name
    #[serde(default)]
    pub name: Option<String>,
    /// Class list
    #[serde(default)]
    pub classes: Vec<String>,
    /// Bounds
    pub rect: Rect,
    /// Link destination
    #[serde(default)]
    pub href: Option<String>,
    /// Participates in hit-testing
    #[serde(default = "default_pointer_events")]
    pub pointer_events: bool,
    /// Child nodes in paint order
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

fn default_pointer_events() -> bool {
    true
}

/// In-memory [`DocumentHost`]
pub struct MemoryDocument {
    elements: Vec<Element>,
    root: ElementId,
    viewport: Viewport,
    class_names: ClassNames,
    dispatched: Vec<(ElementId, PointerEvent)>,
    opened_urls: Vec<String>,
    splatters: Vec<SplatterTrigger>,
}

impl MemoryDocument {
    /// Document with a single `body` covering the viewport
    pub fn new(viewport: Viewport, class_names: ClassNames) -> Self {
        let body = Element::new("body", Rect::new(0.0, 0.0, viewport.width, viewport.height));
        Self {
            elements: vec![body],
            root: ElementId(0),
            viewport,
            class_names,
            dispatched: Vec::new(),
            opened_urls: Vec::new(),
            splatters: Vec::new(),
        }
    }

    /// Build a document from a layout tree; the layout root becomes `body`
    pub fn from_layout(layout: &LayoutNode, viewport: Viewport, class_names: ClassNames) -> Self {
        let mut document = Self::new(viewport, class_names);
        let root = document.root;
        document.elements[0] = Self::element_from_layout(layout);
        for child in &layout.children {
            document.append_layout(root, child);
        }
        document
    }

    /// Load a JSON layout file
    pub fn load(
        path: impl AsRef<Path>,
        viewport: Viewport,
        class_names: ClassNames,
    ) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        let layout: LayoutNode = serde_json::from_str(&content)?;
        Ok(Self::from_layout(&layout, viewport, class_names))
    }

    fn element_from_layout(layout: &LayoutNode) -> Element {
        let mut element = Element::new(layout.tag.as_str(), layout.rect);
        element.name = layout.name.clone();
        element.classes = layout.classes.iter().cloned().collect();
        element.href = layout.href.clone();
        element.pointer_events = layout.pointer_events;
        element
    }

    fn append_layout(&mut self, parent: ElementId, layout: &LayoutNode) {
        let id = self.append(parent, Self::element_from_layout(layout));
        for child in &layout.children {
            self.append_layout(id, child);
        }
    }

    /// Root element
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Append an element as the last child of `parent`
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        if let Some(parent) = self.elements.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Detach an element (and its subtree) from its parent
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.elements.get(id.0).and_then(|e| e.parent) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(parent.0) {
            parent.children.retain(|child| *child != id);
        }
        if let Some(element) = self.elements.get_mut(id.0) {
            element.parent = None;
        }
    }

    /// Look up an element
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Find the first element with a given name
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name.as_deref() == Some(name))
            .map(ElementId)
    }

    /// Check for a class on an element
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Configured class names
    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Resize the viewport (and the body with it)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(root) = self.elements.get_mut(self.root.0) {
            root.rect = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        }
    }

    /// Events dispatched so far
    pub fn dispatched(&self) -> &[(ElementId, PointerEvent)] {
        &self.dispatched
    }

    /// URLs opened so far
    pub fn opened_urls(&self) -> &[String] {
        &self.opened_urls
    }

    /// Splatter triggers received so far
    pub fn splatters(&self) -> &[SplatterTrigger] {
        &self.splatters
    }

    /// Topmost element under `point` within the subtree at `root`
    ///
    /// Children paint over their parent, later siblings over earlier ones.
    /// Walks with an explicit stack so nesting depth is bounded by memory only.
    fn hit_test(&self, root: ElementId, point: Point) -> Option<ElementId> {
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            let Some(element) = self.elements.get(id.0) else {
                continue;
            };
            if expanded {
                if element.pointer_events && element.rect.contains(point) {
                    return Some(id);
                }
                continue;
            }
            // Revisit after the children; the last child is popped first
            stack.push((id, true));
            stack.extend(element.children.iter().map(|&child| (child, false)));
        }

        None
    }

    fn marker_class(&self, marker: Marker) -> &str {
        match marker {
            Marker::Hovering => &self.class_names.hovering,
            Marker::Activated => &self.class_names.activated,
        }
    }
}

impl DocumentHost for MemoryDocument {
    type Node = ElementId;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_at(&self, point: Point) -> Option<ElementId> {
        if !self.viewport.contains(point) {
            return None;
        }
        self.hit_test(self.root, point)
    }

    fn parent(&self, node: ElementId) -> Option<ElementId> {
        self.elements.get(node.0).and_then(|e| e.parent)
    }

    fn is_interactive(&self, node: ElementId) -> bool {
        self.elements.get(node.0).is_some_and(|e| {
            e.has_class(&self.class_names.interactive) || e.tag == "button" || e.tag == "a"
        })
    }

    fn set_marker(&mut self, node: ElementId, marker: Marker, on: bool) {
        let class = self.marker_class(marker).to_string();
        if let Some(element) = self.elements.get_mut(node.0) {
            if on {
                element.classes.insert(class);
            } else {
                element.classes.remove(&class);
            }
        }
    }

    fn link_target(&self, node: ElementId) -> Option<String> {
        self.elements
            .get(node.0)
            .filter(|e| e.tag == "a")
            .and_then(|e| e.href.clone())
    }

    fn dispatch(&mut self, node: ElementId, event: &PointerEvent) {
        debug!(
            "Dispatching {} to {:?} at ({:.1}, {:.1})",
            event.event_type.as_str(),
            node,
            event.client_x,
            event.client_y
        );
        self.dispatched.push((node, event.clone()));
    }

    fn open_in_new_context(&mut self, url: &str) {
        debug!("Opening {} in new context", url);
        self.opened_urls.push(url.to_string());
    }

    fn on_splatter(&mut self, trigger: &SplatterTrigger) {
        self.splatters.push(*trigger);
    }
}

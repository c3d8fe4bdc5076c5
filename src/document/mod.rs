//! Host document abstraction
//!
//! The pipeline never touches a concrete UI tree. It needs a handful of
//! operations from its host: hit-testing, parent lookup, an "is this
//! interactive" query, marker toggling, event dispatch, and navigation.
//! [`DocumentHost`] collects exactly those.
//!
//! [`MemoryDocument`] is a self-contained implementation used by the replay
//! binary and the tests.

use std::fmt::Debug;

use crate::cursor::SplatterTrigger;
use crate::input::{Point, PointerEvent, Viewport};

mod memory;

pub use memory::{
    ClassNames, DocumentError, Element, ElementId, LayoutNode, MemoryDocument, Rect,
};

/// Guard against malformed trees with parent cycles
pub const MAX_ANCESTOR_DEPTH: usize = 1024;

/// Visual state flags the pipeline toggles on elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Pointer is over this element or one of its descendants
    Hovering,
    /// Short pulse after an action was dispatched here
    Activated,
}

/// Operations the pointer pipeline needs from its host
pub trait DocumentHost {
    /// Element identity; must not own the element
    type Node: Copy + Eq + Debug + 'static;

    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Topmost element at a viewport position
    fn element_at(&self, point: Point) -> Option<Self::Node>;

    /// Parent element, `None` at the root or for detached nodes
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element carries the interactive marker class or is a native button/anchor
    fn is_interactive(&self, node: Self::Node) -> bool;

    /// Set or clear a visual marker
    fn set_marker(&mut self, node: Self::Node, marker: Marker, on: bool);

    /// Destination if the element is a navigable link
    fn link_target(&self, node: Self::Node) -> Option<String>;

    /// Deliver a synthesized event to an element
    fn dispatch(&mut self, node: Self::Node, event: &PointerEvent);

    /// Open a URL in a new browsing context
    fn open_in_new_context(&mut self, url: &str);

    /// Cosmetic hook for fast pointer motion
    fn on_splatter(&mut self, _trigger: &SplatterTrigger) {}
}

/// The node itself followed by its ancestors, innermost first
pub fn ancestors<'a, D: DocumentHost>(
    document: &'a D,
    node: D::Node,
) -> impl Iterator<Item = D::Node> + 'a {
    std::iter::successors(Some(node), move |current| document.parent(*current))
        .take(MAX_ANCESTOR_DEPTH)
}

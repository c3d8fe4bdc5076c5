//! Hover tracking
//!
//! Resolves the element under the pointer every frame and keeps the
//! "hovering" marker on the interactive part of its ancestor chain. The
//! interactive target is often a wrapping container rather than the element
//! that was hit, hence the walk.

use tracing::debug;

use crate::document::{ancestors, DocumentHost, Marker};
use crate::input::Point;

/// Result of one hover update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverUpdate<N> {
    /// Element now under the pointer
    pub hovered: Option<N>,
    /// Hovered element or an ancestor is interactive
    pub clickable: bool,
    /// The hovered element differs from the previous frame
    pub changed: bool,
}

/// Tracks the hovered element by identity
#[derive(Debug, Clone)]
pub struct HoverTracker<N> {
    hovered: Option<N>,
    clickable: bool,
    /// Nodes currently carrying the hovering marker
    marked: Vec<N>,
}

impl<N: Copy + Eq + std::fmt::Debug + 'static> HoverTracker<N> {
    /// Tracker with nothing hovered
    pub fn new() -> Self {
        Self {
            hovered: None,
            clickable: false,
            marked: Vec::new(),
        }
    }

    /// Currently hovered element
    pub fn hovered(&self) -> Option<N> {
        self.hovered
    }

    /// Whether the hovered chain contains an interactive element
    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    /// Hit-test at `point` and move hover markers if the target changed
    pub fn update<D>(&mut self, document: &mut D, point: Point) -> HoverUpdate<N>
    where
        D: DocumentHost<Node = N>,
    {
        let target = document.element_at(point);

        if target == self.hovered {
            return HoverUpdate {
                hovered: target,
                clickable: self.clickable,
                changed: false,
            };
        }

        self.clear_markers(document);

        let interactive: Vec<N> = match target {
            Some(node) => {
                let view: &D = document;
                ancestors(view, node)
                    .filter(|n| view.is_interactive(*n))
                    .collect()
            }
            None => Vec::new(),
        };
        for node in &interactive {
            document.set_marker(*node, Marker::Hovering, true);
        }

        debug!(
            "Hover changed: {:?} -> {:?} ({} interactive ancestors)",
            self.hovered,
            target,
            interactive.len()
        );

        self.hovered = target;
        self.clickable = !interactive.is_empty();
        self.marked = interactive;

        HoverUpdate {
            hovered: target,
            clickable: self.clickable,
            changed: true,
        }
    }

    /// Drop all hover markers, e.g. on teardown mid-hover
    pub fn clear<D>(&mut self, document: &mut D)
    where
        D: DocumentHost<Node = N>,
    {
        self.clear_markers(document);
        self.hovered = None;
        self.clickable = false;
    }

    fn clear_markers<D>(&mut self, document: &mut D)
    where
        D: DocumentHost<Node = N>,
    {
        let mut stale: Vec<N> = match self.hovered {
            Some(previous) => ancestors(&*document, previous).collect(),
            None => Vec::new(),
        };
        // Marked nodes may have been re-parented since they were marked
        stale.extend(self.marked.drain(..));

        for node in stale {
            document.set_marker(node, Marker::Hovering, false);
        }
    }
}

impl<N: Copy + Eq + std::fmt::Debug + 'static> Default for HoverTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

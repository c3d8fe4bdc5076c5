//! Synthetic Pointer Events
//!
//! Shape of the events the dispatcher hands to the host. They mirror a native
//! mouse event closely enough that host listeners cannot tell them apart.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::input::coordinates::Point;
use crate::input::gesture::ActionKind;

/// Mouse button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
}

impl MouseButton {
    /// DOM `button` index
    pub fn index(&self) -> u16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 2,
        }
    }
}

/// Native event type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventType {
    /// Primary click
    Click,
    /// Context menu request
    ContextMenu,
}

impl PointerEventType {
    /// Event type string as the host knows it
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerEventType::Click => "click",
            PointerEventType::ContextMenu => "contextmenu",
        }
    }

    /// Button that produces this event natively
    pub fn button(&self) -> MouseButton {
        match self {
            PointerEventType::Click => MouseButton::Left,
            PointerEventType::ContextMenu => MouseButton::Right,
        }
    }
}

impl From<ActionKind> for PointerEventType {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Primary => PointerEventType::Click,
            ActionKind::Context => PointerEventType::ContextMenu,
        }
    }
}

/// A synthesized pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Native event type
    pub event_type: PointerEventType,
    /// Button reported with the event
    pub button: MouseButton,
    /// Viewport X coordinate
    pub client_x: f64,
    /// Viewport Y coordinate
    pub client_y: f64,
    /// Propagates to ancestors
    pub bubbles: bool,
    /// Listeners may prevent the default action
    pub cancelable: bool,
    /// Creation time
    pub timestamp: Instant,
}

impl PointerEvent {
    /// Build the event for an action at a viewport position
    pub fn new(kind: ActionKind, at: Point, timestamp: Instant) -> Self {
        let event_type = PointerEventType::from(kind);
        Self {
            event_type,
            button: event_type.button(),
            client_x: at.x,
            client_y: at.y,
            bubbles: true,
            cancelable: true,
            timestamp,
        }
    }

    /// Client coordinates as a point
    pub fn position(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_event_shape() {
        let event = PointerEvent::new(ActionKind::Primary, Point::new(12.0, 34.0), Instant::now());
        assert_eq!(event.event_type.as_str(), "click");
        assert_eq!(event.button, MouseButton::Left);
        assert_eq!(event.button.index(), 0);
        assert_eq!(event.position(), Point::new(12.0, 34.0));
        assert!(event.bubbles);
        assert!(event.cancelable);
    }

    #[test]
    fn test_context_event_shape() {
        let event = PointerEvent::new(ActionKind::Context, Point::new(1.0, 2.0), Instant::now());
        assert_eq!(event.event_type.as_str(), "contextmenu");
        assert_eq!(event.button, MouseButton::Right);
        assert_eq!(event.button.index(), 2);
    }
}

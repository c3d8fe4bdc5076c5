//! Pointer State
//!
//! The single mutable record of where the virtual pointer is. Written once per
//! frame by the pipeline, read by whatever draws the pointer glyph.

use std::time::Instant;

use crate::input::coordinates::Point;

/// Current virtual pointer state
///
/// `N` is the host's element identity; holding one does not keep the element
/// alive.
#[derive(Debug, Clone)]
pub struct PointerState<N> {
    /// Current position in viewport pixels, always clamped
    pub position: Point,

    /// Position before the most recent update
    pub previous_position: Point,

    /// When the position was last updated
    pub last_frame_timestamp: Option<Instant>,

    /// Element under the pointer after the last hit-test
    pub hovered_element: Option<N>,

    /// Hovered element or an ancestor is interactive
    pub is_hovering_clickable: bool,
}

impl<N> PointerState<N> {
    /// Pointer parked at the origin
    pub fn new() -> Self {
        Self {
            position: Point::default(),
            previous_position: Point::default(),
            last_frame_timestamp: None,
            hovered_element: None,
            is_hovering_clickable: false,
        }
    }

    /// Move the pointer, remembering the previous position
    pub fn move_to(&mut self, position: Point, now: Instant) {
        self.previous_position = self.position;
        self.position = position;
        self.last_frame_timestamp = Some(now);
    }

    /// Where to draw the glyph in document coordinates
    ///
    /// The position is in viewport space; a scrolled document needs the
    /// scroll offset added back.
    pub fn glyph_position(&self, scroll: Point) -> Point {
        Point::new(self.position.x + scroll.x, self.position.y + scroll.y)
    }
}

impl<N> Default for PointerState<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_tracks_previous() {
        let mut state: PointerState<u32> = PointerState::new();
        let now = Instant::now();
        state.move_to(Point::new(10.0, 20.0), now);
        state.move_to(Point::new(30.0, 40.0), now);
        assert_eq!(state.previous_position, Point::new(10.0, 20.0));
        assert_eq!(state.position, Point::new(30.0, 40.0));
        assert_eq!(state.last_frame_timestamp, Some(now));
    }

    #[test]
    fn test_glyph_position_adds_scroll() {
        let mut state: PointerState<u32> = PointerState::new();
        state.move_to(Point::new(100.0, 50.0), Instant::now());
        assert_eq!(
            state.glyph_position(Point::new(0.0, 400.0)),
            Point::new(100.0, 450.0)
        );
    }
}

//! Coordinate Mapping
//!
//! Maps the normalized palm position from camera space into viewport pixels.
//!
//! # Transformation
//!
//! ```text
//! pixel   = normalized * (viewport + 2 * margin) - margin
//! x       = viewport_width - x          (front camera mirror)
//! (x, y)  = clamp to [0, width] x [0, height]
//! ```
//!
//! The margin extrapolates past the camera frame so a hand that is still
//! comfortably inside the field of view can reach the true viewport edges.

use serde::{Deserialize, Serialize};

use crate::input::error::{InputError, Result};

/// A 2D point, either normalized camera space or viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both components finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Visible area of the host, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, rejecting negative or non-finite sizes
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(InputError::InvalidViewport(width, height));
        }
        Ok(Self { width, height })
    }

    /// Create a viewport, collapsing unusable dimensions to zero
    pub fn clamped(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Check if a point lies within the viewport (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Clamp a point into the viewport
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(0.0).min(self.width),
            point.y.max(0.0).min(self.height),
        )
    }
}

/// Maps normalized camera coordinates to viewport pixels
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    /// Horizontal extrapolation margin (pixels)
    margin_x: f64,

    /// Vertical extrapolation margin (pixels)
    margin_y: f64,

    /// Mirror the horizontal axis for a front-facing camera
    mirror_x: bool,
}

impl CoordinateMapper {
    /// Default horizontal margin
    pub const DEFAULT_MARGIN_X: f64 = 100.0;

    /// Default vertical margin
    pub const DEFAULT_MARGIN_Y: f64 = 200.0;

    /// Create a mapper with explicit margins
    pub fn new(margin_x: f64, margin_y: f64, mirror_x: bool) -> Self {
        Self {
            margin_x,
            margin_y,
            mirror_x,
        }
    }

    /// Map a normalized point into viewport pixels
    ///
    /// Pure in `(normalized, viewport)`; evaluate every frame since the
    /// viewport may have been resized.
    pub fn map(&self, normalized: Point, viewport: Viewport) -> Result<Point> {
        if !normalized.is_finite() {
            return Err(InputError::InvalidCoordinate(normalized.x, normalized.y));
        }

        let mut x = Self::extrapolate(normalized.x, viewport.width, self.margin_x);
        let y = Self::extrapolate(normalized.y, viewport.height, self.margin_y);

        if self.mirror_x {
            x = viewport.width - x;
        }

        let mapped = viewport.clamp(Point::new(x, y));

        // inf - inf is the only way to get here with finite input
        if !mapped.is_finite() {
            return Err(InputError::InvalidCoordinate(mapped.x, mapped.y));
        }

        Ok(mapped)
    }

    fn extrapolate(normalized: f64, size: f64, margin: f64) -> f64 {
        normalized * (size + 2.0 * margin) - margin
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARGIN_X, Self::DEFAULT_MARGIN_Y, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0).unwrap()
    }

    #[test]
    fn test_centre_maps_to_centre() {
        let mapper = CoordinateMapper::default();
        let point = mapper.map(Point::new(0.5, 0.5), viewport()).unwrap();
        assert!((point.x - 500.0).abs() < 1e-9);
        assert!((point.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_mirror() {
        let mapper = CoordinateMapper::default();

        // Hand on the left of the camera image drives the pointer right
        let point = mapper.map(Point::new(0.25, 0.5), viewport()).unwrap();
        // 0.25 * 1200 - 100 = 200, mirrored = 800
        assert!((point.x - 800.0).abs() < 1e-9);

        let unmirrored = CoordinateMapper::new(100.0, 200.0, false);
        let point = unmirrored.map(Point::new(0.25, 0.5), viewport()).unwrap();
        assert!((point.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_margin_reaches_edges_early() {
        let mapper = CoordinateMapper::default();

        // y = 0.1 * 1200 - 200 = -80, clamped to the top edge
        let point = mapper.map(Point::new(0.5, 0.1), viewport()).unwrap();
        assert_eq!(point.y, 0.0);

        // y = 0.9 * 1200 - 200 = 880, clamped to the bottom edge
        let point = mapper.map(Point::new(0.5, 0.9), viewport()).unwrap();
        assert_eq!(point.y, 800.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let mapper = CoordinateMapper::default();
        let point = mapper.map(Point::new(-0.3, 1.4), viewport()).unwrap();
        assert_eq!(point, Point::new(1000.0, 800.0));

        let point = mapper.map(Point::new(1e300, -1e300), viewport()).unwrap();
        assert!(viewport().contains(point));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mapper = CoordinateMapper::default();
        assert!(matches!(
            mapper.map(Point::new(f64::NAN, 0.5), viewport()),
            Err(InputError::InvalidCoordinate(_, _))
        ));
        assert!(mapper
            .map(Point::new(0.5, f64::INFINITY), viewport())
            .is_err());
    }

    #[test]
    fn test_resize_is_picked_up() {
        let mapper = CoordinateMapper::default();
        let before = mapper.map(Point::new(0.5, 0.5), viewport()).unwrap();
        let after = mapper
            .map(Point::new(0.5, 0.5), Viewport::new(2000.0, 1000.0).unwrap())
            .unwrap();
        assert_ne!(before, after);
        assert!((after.x - 1000.0).abs() < 1e-9);
        assert!((after.y - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(-1.0, 10.0).is_err());
        assert!(Viewport::new(10.0, f64::NAN).is_err());

        let clamped = Viewport::clamped(-5.0, f64::INFINITY);
        assert_eq!(clamped.width, 0.0);
        assert_eq!(clamped.height, 0.0);
    }

    #[test]
    fn test_zero_viewport() {
        let mapper = CoordinateMapper::default();
        let point = mapper
            .map(Point::new(0.7, 0.2), Viewport::clamped(0.0, 0.0))
            .unwrap();
        assert_eq!(point, Point::new(0.0, 0.0));
    }
}

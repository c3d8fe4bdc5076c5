//! Pointer Motion Tracking
//!
//! Tracks smoothed pointer velocity across frames and raises a splatter
//! trigger when the pointer is flung faster than a threshold.
//!
//! # Smoothing
//!
//! ```text
//! velocity_smooth = α * velocity_new + (1 - α) * velocity_old
//! ```
//!
//! The trigger is edge based: it fires when speed crosses the threshold and
//! re-arms once speed falls back below it.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::trace;

use crate::input::coordinates::Point;

/// Configuration for motion tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Velocity smoothing factor (0.0-1.0, higher = more responsive)
    #[serde(default = "default_velocity_smoothing")]
    pub velocity_smoothing: f64,

    /// Speed above which a splatter is triggered (pixels/second)
    #[serde(default = "default_splatter_threshold")]
    pub splatter_speed_threshold: f64,
}

fn default_velocity_smoothing() -> f64 {
    0.4
}
fn default_splatter_threshold() -> f64 {
    2500.0
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            velocity_smoothing: default_velocity_smoothing(),
            splatter_speed_threshold: default_splatter_threshold(),
        }
    }
}

/// Cosmetic effect request handed to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatterTrigger {
    /// Where the pointer was when the threshold was crossed
    pub position: Point,
    /// Smoothed speed at that moment (pixels/second)
    pub speed: f64,
}

#[derive(Debug, Clone, Copy)]
struct MotionSample {
    position: Point,
    timestamp: Instant,
}

/// Smoothed velocity tracker
pub struct MotionTracker {
    config: MotionConfig,

    /// Previous sample; velocity is derived from it and the current one
    last: Option<MotionSample>,

    /// Smoothed velocity (pixels/second)
    velocity: (f64, f64),

    /// Speed dropped below the threshold since the last trigger
    armed: bool,
}

impl MotionTracker {
    /// Create a new tracker
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            last: None,
            velocity: (0.0, 0.0),
            armed: true,
        }
    }

    /// Record a new pointer position
    pub fn update(&mut self, position: Point, now: Instant) -> Option<SplatterTrigger> {
        let sample = MotionSample {
            position,
            timestamp: now,
        };
        if let Some(prev) = self.last.replace(sample) {
            self.update_velocity(prev, sample);
        }

        let speed = self.speed();
        trace!(
            "Motion update: pos=({:.1}, {:.1}), vel=({:.1}, {:.1})",
            position.x,
            position.y,
            self.velocity.0,
            self.velocity.1
        );

        if speed < self.config.splatter_speed_threshold {
            self.armed = true;
            return None;
        }

        if !self.armed {
            return None;
        }
        self.armed = false;

        Some(SplatterTrigger { position, speed })
    }

    /// Magnitude of the smoothed velocity
    pub fn speed(&self) -> f64 {
        (self.velocity.0.powi(2) + self.velocity.1.powi(2)).sqrt()
    }

    /// Forget the previous sample, e.g. after the hand left the frame
    pub fn reset(&mut self) {
        self.last = None;
        self.velocity = (0.0, 0.0);
        self.armed = true;
    }

    fn update_velocity(&mut self, prev: MotionSample, recent: MotionSample) {
        let dt = recent
            .timestamp
            .saturating_duration_since(prev.timestamp)
            .as_secs_f64();
        if dt <= 0.0 {
            return;
        }

        let vx = (recent.position.x - prev.position.x) / dt;
        let vy = (recent.position.y - prev.position.y) / dt;

        let alpha = self.config.velocity_smoothing;
        self.velocity.0 = alpha * vx + (1.0 - alpha) * self.velocity.0;
        self.velocity.1 = alpha * vy + (1.0 - alpha) * self.velocity.1;
    }
}

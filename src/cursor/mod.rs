//! Virtual pointer state and motion
//!
//! The pipeline owns one [`PointerState`] and one [`MotionTracker`] per
//! session.
//!
//! # Architecture
//!
//! ```text
//! Mapped position
//!   ├─> PointerState
//!   │     ├─> position / previous_position
//!   │     └─> hovered element, clickable flag
//!   └─> MotionTracker
//!         ├─> smoothed velocity
//!         └─> SplatterTrigger (speed crosses threshold)
//! ```

mod motion;
mod state;

pub use motion::{MotionConfig, MotionTracker, SplatterTrigger};
pub use state::PointerState;

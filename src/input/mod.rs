//! Gesture Input Handling
//!
//! Everything between a recognition result and a pointer action that does not
//! touch the host document.
//!
//! # Architecture
//!
//! ```text
//! RecognitionResult
//!       ↓
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  LandmarkAggregator  │     │  GestureDebouncer    │ ← top label
//! │  palm centre (0..1)  │     │  rising edges only   │
//! └──────────────────────┘     └──────────────────────┘
//!       ↓                             ↓
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  CoordinateMapper    │ ──▶ │  PointerEvent        │
//! │  margin, mirror      │     │  click / contextmenu │
//! └──────────────────────┘     └──────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Frames without a hand or a gesture are routine. All operations return
//! `Result<T, InputError>`, and [`error::recovery_action`] decides whether an
//! error means "skip this frame" or something the user should see.

// Core modules
pub mod coordinates;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod mouse;

// Re-export main types for convenience
pub use coordinates::{CoordinateMapper, Point, Viewport};
pub use error::{classify_error, recovery_action, ErrorType, InputError, RecoveryAction, Result};
pub use gesture::{ActionKind, GestureBinding, GestureDebouncer, GestureLabel};
pub use landmarks::{
    GestureCategory, Landmark, LandmarkAggregator, RecognitionResult, HAND_LANDMARK_COUNT,
    PALM_INDICES,
};
pub use mouse::{MouseButton, PointerEvent, PointerEventType};

//! # gesture-pointer
//!
//! Hand-gesture driven virtual pointer. Per-frame hand landmarks and gesture
//! labels from a recognizer go in; pointer movement, hover markers, and
//! synthesized click / context-menu events on a host document come out.
//!
//! # Architecture
//!
//! ```text
//! gesture-pointer
//!   ├─> FrameLoop (one recognition in flight, display-rate ticks)
//!   │     ├─> FrameSource (camera or recording)
//!   │     └─> GestureRecognizer (model or recording)
//!   ├─> PointerPipeline
//!   │     ├─> LandmarkAggregator → CoordinateMapper (input)
//!   │     ├─> PointerState, MotionTracker (cursor)
//!   │     ├─> HoverTracker (pointer)
//!   │     └─> GestureDebouncer → ActionDispatcher (input, pointer)
//!   └─> DocumentHost (hit-test, markers, event delivery)
//! ```
//!
//! # Data Flow
//!
//! **Pointer Path:** Frame → Recognizer → palm centre → viewport point → hover
//!
//! **Action Path:** Top gesture label → rising edge → event at pointer → target
//!
//! **Fallback Path:** Primary key → click at pointer

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Configuration
pub mod config;

/// Pointer state and motion tracking
pub mod cursor;

/// Host document abstraction and in-memory implementation
pub mod document;

/// Landmarks, mapping, gesture debouncing, synthetic events
pub mod input;

/// Hover tracking and action dispatch
pub mod pointer;

/// Frame loop, pipeline, and session collaborators
pub mod session;

/// Utility functions
pub mod utils;

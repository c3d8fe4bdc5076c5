//! Pointer effects on the host document
//!
//! # Architecture
//!
//! ```text
//! Pointer position
//!   ├─> HoverTracker
//!   │     ├─> element_at(position)
//!   │     └─> hovering marker on interactive ancestors
//!   └─> ActionDispatcher (on fired action)
//!         ├─> click / contextmenu event at target
//!         ├─> link navigation (primary only)
//!         └─> activated pulse, expired on later ticks
//! ```

mod dispatch;
mod hover;

pub use dispatch::{ActionDispatcher, Dispatched};
pub use hover::{HoverTracker, HoverUpdate};

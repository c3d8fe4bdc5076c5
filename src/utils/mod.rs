//! Utility Functions
//!
//! ## Error Formatting
//!
//! The [`errors`] module provides user-friendly error messages:
//!
//! ```rust,no_run
//! use gesture_pointer::utils::format_user_error;
//!
//! # fn start() -> anyhow::Result<()> { Ok(()) }
//! if let Err(e) = start() {
//!     eprintln!("{}", format_user_error(&e));
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Camera errors → permission, device in use, no device
//! - Model errors → missing model, empty recording
//! - Recording and layout errors → path and JSON shape
//! - Config errors → syntax, invalid values

pub mod errors;

pub use errors::format_user_error;

//! Gesture Pointer Session
//!
//! A session couples one frame source, one recognizer and one host document
//! for as long as the pointer is active.
//!
//! # Architecture
//!
//! ```text
//! FrameLoop
//!   ├─> FrameSource (camera or recording)
//!   ├─> GestureRecognizer (model or recording), loaded asynchronously
//!   └─> PointerPipeline
//!         ├─> LandmarkAggregator → CoordinateMapper → PointerState
//!         ├─> MotionTracker (splatter)
//!         ├─> HoverTracker
//!         └─> GestureDebouncer → ActionDispatcher
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gesture_pointer::config::Config;
//! use gesture_pointer::document::MemoryDocument;
//! use gesture_pointer::input::Viewport;
//! use gesture_pointer::session::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default_config()?;
//! let recording = Arc::new(Recording::load("session.json").await?);
//! let document = MemoryDocument::new(Viewport::new(1280.0, 720.0)?, config.class_names());
//! let source = ReplayFrameSource::new(recording.clone(), Pacing::RealTime);
//!
//! let mut frame_loop = FrameLoop::new(source, document, &config);
//! let (_keys_tx, keys_rx) = tokio::sync::mpsc::channel(16);
//! let summary = frame_loop
//!     .run(ReplayRecognizer::load(recording), keys_rx, CancellationToken::new())
//!     .await?;
//! println!("{} frames", summary.stats.frames_processed);
//! # Ok(())
//! # }
//! ```

mod frame_loop;
mod pipeline;
mod replay;
mod source;

pub use frame_loop::{FrameLoop, SessionSummary, TickOutcome};
pub use pipeline::{FrameOutcome, FrameReport, PipelineStats, PointerPipeline};
pub use replay::{Pacing, RecordedFrame, Recording, ReplayFrameSource, ReplayRecognizer};
pub use source::{FrameSource, GestureRecognizer, SessionError, VideoFrame};

//! Session collaborators
//!
//! The frame loop talks to two outside parties: a video frame source (the
//! camera) and a gesture recognizer (the model). Both sit behind traits so the
//! loop can run against recordings, mocks, or real hardware alike.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::input::{InputError, RecognitionResult};

/// Session lifecycle errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Camera could not be opened
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// Recognition model failed to load
    #[error("Model load failed: {0}")]
    ModelLoadFailed(String),

    /// Recording file could not be read
    #[error("Failed to read recording: {0}")]
    RecordingIo(#[from] std::io::Error),

    /// Recording file is malformed
    #[error("Invalid recording: {0}")]
    RecordingFormat(#[from] serde_json::Error),

    /// A frame raised an error that ends the session
    #[error("Session stopped: {0}")]
    Stopped(#[source] InputError),
}

impl SessionError {
    /// Input-level view of the failure, used for recovery classification
    pub fn to_input_error(&self) -> InputError {
        match self {
            SessionError::CameraUnavailable(msg) => InputError::CameraUnavailable(msg.clone()),
            SessionError::ModelLoadFailed(msg) => InputError::ModelLoadFailed(msg.clone()),
            SessionError::Stopped(error) => error.clone(),
            other => InputError::ModelLoadFailed(other.to_string()),
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// One captured video frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Capture counter
    pub sequence: u64,
    /// Stream time of this frame (seconds); unchanged until a new frame arrives
    pub current_time: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data (empty for replayed frames)
    pub data: Bytes,
}

impl VideoFrame {
    /// Frame with no pixel payload
    pub fn empty(sequence: u64, current_time: f64) -> Self {
        Self {
            sequence,
            current_time,
            width: 0,
            height: 0,
            data: Bytes::new(),
        }
    }
}

/// Source of video frames
#[cfg_attr(test, mockall::automock)]
pub trait FrameSource: Send {
    /// Latest available frame, `None` until the stream produces one
    fn current_frame(&mut self) -> Option<VideoFrame>;

    /// Stream has no more frames to offer
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Stop the stream and release the device
    fn release(&mut self);
}

/// Hand landmark and gesture recognizer
#[async_trait]
pub trait GestureRecognizer: Send {
    /// Recognize a single frame
    ///
    /// `timestamp_ms` is wall-clock milliseconds and must increase between
    /// calls.
    async fn recognize(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: i64,
    ) -> std::result::Result<RecognitionResult, InputError>;
}

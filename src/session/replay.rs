//! Recording-backed collaborators
//!
//! A recording is a JSON file of recognizer outputs captured from a live
//! session. Replaying it drives the whole pipeline without a camera or model,
//! which is how the binary runs headless and how the integration tests work.
//!
//! ```json
//! {
//!   "frame_interval_ms": 33,
//!   "frames": [
//!     { "landmarks": [[{"x": 0.5, "y": 0.5}, ...]],
//!       "gestures": [[{"categoryName": "Closed_Fist", "score": 0.9}]] },
//!     { "time": 0.5, "landmarks": [], "gestures": [] }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use super::source::{FrameSource, GestureRecognizer, Result, SessionError, VideoFrame};
use crate::input::{GestureCategory, InputError, Landmark, RecognitionResult};

fn default_frame_interval_ms() -> u64 {
    33
}

/// One recorded recognizer output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Stream time in seconds; derived from the frame interval when absent
    #[serde(default)]
    pub time: Option<f64>,
    /// Landmarks per hand
    #[serde(default)]
    pub landmarks: Vec<Vec<Landmark>>,
    /// Ranked gestures per hand
    #[serde(default)]
    pub gestures: Vec<Vec<GestureCategory>>,
}

impl RecordedFrame {
    fn result(&self) -> RecognitionResult {
        RecognitionResult {
            landmarks: self.landmarks.clone(),
            gestures: self.gestures.clone(),
        }
    }
}

/// A captured session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Spacing of frames without an explicit time
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Frames in capture order
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Recording from in-memory frames
    pub fn new(frame_interval_ms: u64, frames: Vec<RecordedFrame>) -> Self {
        Self {
            frame_interval_ms,
            frames,
        }
    }

    /// Parse a recording from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a recording file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let recording = Self::from_json(&content)?;
        info!(
            "Loaded recording {} ({} frames, {:.1}s)",
            path.display(),
            recording.frames.len(),
            recording.duration()
        );
        Ok(recording)
    }

    /// Stream time of frame `index`
    pub fn frame_time(&self, index: usize) -> f64 {
        self.frames
            .get(index)
            .and_then(|f| f.time)
            .unwrap_or(index as f64 * self.frame_interval_ms as f64 / 1000.0)
    }

    /// Duration of the recording in seconds
    pub fn duration(&self) -> f64 {
        match self.frames.len() {
            0 => 0.0,
            n => self.frame_time(n - 1),
        }
    }
}

/// How replayed frames advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Follow recorded stream times against the clock
    RealTime,
    /// One new frame per `current_frame` call
    Stepped,
}

/// Frame source that plays back a recording
pub struct ReplayFrameSource {
    recording: Arc<Recording>,
    pacing: Pacing,
    started: Option<Instant>,
    cursor: usize,
    released: bool,
}

impl ReplayFrameSource {
    /// Create a source over a shared recording
    pub fn new(recording: Arc<Recording>, pacing: Pacing) -> Self {
        Self {
            recording,
            pacing,
            started: None,
            cursor: 0,
            released: false,
        }
    }

    /// Whether [`FrameSource::release`] has been called
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn frame(&self, index: usize) -> VideoFrame {
        VideoFrame::empty(index as u64, self.recording.frame_time(index))
    }

    fn latest_due(&self, elapsed: f64) -> Option<usize> {
        let due = (0..self.recording.frames.len())
            .take_while(|&i| self.recording.frame_time(i) <= elapsed)
            .count();
        due.checked_sub(1)
    }
}

impl FrameSource for ReplayFrameSource {
    fn current_frame(&mut self) -> Option<VideoFrame> {
        if self.released || self.recording.frames.is_empty() {
            return None;
        }

        match self.pacing {
            Pacing::Stepped => {
                let index = self.cursor.min(self.recording.frames.len() - 1);
                self.cursor = (self.cursor + 1).min(self.recording.frames.len());
                Some(self.frame(index))
            }
            Pacing::RealTime => {
                let started = *self.started.get_or_insert_with(Instant::now);
                let elapsed = started.elapsed().as_secs_f64();
                let index = self.latest_due(elapsed)?;
                self.cursor = index + 1;
                Some(self.frame(index))
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.released || self.cursor >= self.recording.frames.len()
    }

    fn release(&mut self) {
        if !self.released {
            debug!("Replay source released at frame {}", self.cursor);
        }
        self.released = true;
    }
}

/// Recognizer that answers with recorded outputs
pub struct ReplayRecognizer {
    recording: Arc<Recording>,
    last_timestamp_ms: Option<i64>,
}

impl ReplayRecognizer {
    /// Bootstrap the recognizer
    ///
    /// Mirrors a model load: fails if the recording holds nothing to replay.
    pub async fn load(recording: Arc<Recording>) -> Result<Self> {
        if recording.frames.is_empty() {
            return Err(SessionError::ModelLoadFailed(
                "recording contains no frames".to_string(),
            ));
        }
        Ok(Self {
            recording,
            last_timestamp_ms: None,
        })
    }
}

#[async_trait]
impl GestureRecognizer for ReplayRecognizer {
    async fn recognize(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: i64,
    ) -> std::result::Result<RecognitionResult, InputError> {
        if let Some(last) = self.last_timestamp_ms {
            if timestamp_ms < last {
                return Err(InputError::RecognitionFailed(format!(
                    "timestamp went backwards ({} < {})",
                    timestamp_ms, last
                )));
            }
        }
        self.last_timestamp_ms = Some(timestamp_ms);

        let index = usize::try_from(frame.sequence).unwrap_or(usize::MAX);
        self.recording
            .frames
            .get(index)
            .map(RecordedFrame::result)
            .ok_or(InputError::UnknownFrame(frame.sequence))
    }
}

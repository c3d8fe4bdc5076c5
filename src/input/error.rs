//! Input Pipeline Error Types
//!
//! Most conditions here are not failures at all: a frame without a hand is the
//! common case. [`classify_error`] and [`recovery_action`] tell the pipeline
//! which errors to swallow and which to surface.

use thiserror::Error;

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Input module error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Recognizer reported no hand this frame
    #[error("No hand detected in frame")]
    NoHand,

    /// A required landmark index was absent from the hand
    #[error("Missing landmark index {index} (hand has {available} points)")]
    MissingLandmark {
        /// Requested landmark index
        index: usize,
        /// Number of points the recognizer delivered
        available: usize,
    },

    /// Recognizer reported no gesture classification this frame
    #[error("No gesture classification in frame")]
    NoGesture,

    /// Non-finite or otherwise unusable coordinate
    #[error("Invalid coordinate: ({0}, {1})")]
    InvalidCoordinate(f64, f64),

    /// Viewport dimensions unusable for mapping
    #[error("Invalid viewport: {0}x{1}")]
    InvalidViewport(f64, f64),

    /// Hit-test resolved nothing at the pointer position
    #[error("No element at ({x:.1}, {y:.1})")]
    NoTarget {
        /// Viewport x coordinate
        x: f64,
        /// Viewport y coordinate
        y: f64,
    },

    /// Camera could not be opened (permission denied, no device)
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// Recognition model failed to load
    #[error("Model load failed: {0}")]
    ModelLoadFailed(String),

    /// Recognition call failed for a single frame
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    /// Recognizer was handed a frame it cannot account for
    #[error("Frame {0} is outside the recognizer's stream")]
    UnknownFrame(u64),
}

/// Error classification for recovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Expected absence of input (no hand, no gesture, failed recognition)
    MissingData,
    /// Hit-test found nothing
    NoTarget,
    /// Camera or model bootstrap failed
    Initialization,
    /// Coordinate math produced garbage
    Coordinate,
    /// Unknown error type
    Unknown,
}

/// Classify error for recovery strategy selection
pub fn classify_error(error: &InputError) -> ErrorType {
    match error {
        InputError::NoHand
        | InputError::MissingLandmark { .. }
        | InputError::NoGesture
        | InputError::RecognitionFailed(_) => ErrorType::MissingData,

        InputError::NoTarget { .. } => ErrorType::NoTarget,

        InputError::CameraUnavailable(_) | InputError::ModelLoadFailed(_) => {
            ErrorType::Initialization
        }

        InputError::InvalidCoordinate(_, _) | InputError::InvalidViewport(_, _) => {
            ErrorType::Coordinate
        }

        InputError::UnknownFrame(_) => ErrorType::Unknown,
    }
}

/// Recovery action to take after error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Drop this frame without touching pointer state
    SkipFrame,

    /// Drop the pointer action, keep processing the frame
    NoOp,

    /// Clamp the viewport to an empty rectangle and continue
    ClampCoordinates,

    /// Stop the session and show a visible, non-fatal message
    ReportToUser,

    /// Fail and propagate error
    Fail,
}

/// Determine recovery action for error
pub fn recovery_action(error: &InputError) -> RecoveryAction {
    match classify_error(error) {
        ErrorType::MissingData => RecoveryAction::SkipFrame,
        ErrorType::NoTarget => RecoveryAction::NoOp,
        ErrorType::Initialization => RecoveryAction::ReportToUser,
        ErrorType::Coordinate => match error {
            InputError::InvalidViewport(_, _) => RecoveryAction::ClampCoordinates,
            _ => RecoveryAction::SkipFrame,
        },
        ErrorType::Unknown => RecoveryAction::Fail,
    }
}

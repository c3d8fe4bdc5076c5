//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for the failures that stop a session before it starts.

use std::fmt::Write;

use crate::document::DocumentError;
use crate::input::InputError;
use crate::session::SessionError;

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let error_msg = error.to_string();

    match error.downcast_ref::<SessionError>() {
        Some(
            SessionError::CameraUnavailable(_)
            | SessionError::Stopped(InputError::CameraUnavailable(_)),
        ) => format_camera_error(&mut output),
        Some(
            SessionError::ModelLoadFailed(_)
            | SessionError::Stopped(InputError::ModelLoadFailed(_)),
        ) => format_model_error(&mut output),
        Some(SessionError::RecordingIo(_) | SessionError::RecordingFormat(_)) => {
            format_recording_error(&mut output)
        }
        _ if error.downcast_ref::<DocumentError>().is_some() => format_layout_error(&mut output),
        _ if error_msg.contains("Camera") || error_msg.contains("camera") => {
            format_camera_error(&mut output)
        }
        _ if error_msg.contains("Model") || error_msg.contains("model") => {
            format_model_error(&mut output)
        }
        _ if error_msg.contains("recording") => format_recording_error(&mut output),
        _ if error_msg.contains("config") => format_config_error(&mut output),
        _ => format_generic_error(&mut output, &error_msg),
    }

    // Technical details
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: gesture-pointer -vv"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Set logging.log_dir in config.toml to keep a log file"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_camera_error(output: &mut String) {
    writeln!(output, "Camera Unavailable").ok();
    writeln!(output).ok();
    writeln!(output, "Could not open the camera for hand tracking.").ok();
    writeln!(output, "The pointer stays inactive; nothing else is affected.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Camera permission denied").ok();
    writeln!(output, "     → Allow camera access when prompted").ok();
    writeln!(output, "     → Re-run after changing the permission").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Camera in use by another application").ok();
    writeln!(output, "     → Close video calls or other capture tools").ok();
    writeln!(output).ok();
    writeln!(output, "  3. No camera connected").ok();
    writeln!(output, "     → Check: ls /dev/video*").ok();
    writeln!(output, "     → Use --recording to replay a captured session").ok();
}

fn format_model_error(output: &mut String) {
    writeln!(output, "Gesture Model Failed To Load").ok();
    writeln!(output).ok();
    writeln!(output, "The hand landmark and gesture model could not be loaded.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Model file missing or unreachable").ok();
    writeln!(output, "     → Check network access if the model is downloaded").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Recording has no frames").ok();
    writeln!(output, "     → A replayed session needs at least one frame").ok();
}

fn format_recording_error(output: &mut String) {
    writeln!(output, "Recording Error").ok();
    writeln!(output).ok();
    writeln!(output, "The session recording could not be read.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. File not found").ok();
    writeln!(output, "     → Check the path passed to --recording").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid JSON").ok();
    writeln!(output, "     → Expected: {{\"frames\": [{{\"landmarks\": ..., \"gestures\": ...}}]}}").ok();
    writeln!(output, "     → Gesture entries use \"categoryName\" and \"score\"").ok();
}

fn format_layout_error(output: &mut String) {
    writeln!(output, "Layout Error").ok();
    writeln!(output).ok();
    writeln!(output, "The document layout could not be loaded.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. File not found").ok();
    writeln!(output, "     → Check the path passed to --layout").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid layout JSON").ok();
    writeln!(output, "     → Every node needs \"tag\" and \"rect\"").ok();
    writeln!(output, "     → rect is {{\"x\", \"y\", \"width\", \"height\"}} in pixels").ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    writeln!(
        output,
        "     → Default location: ~/.config/gesture-pointer/config.toml"
    )
    .ok();
    writeln!(
        output,
        "     → Or specify: gesture-pointer -c /path/to/config.toml"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Invalid values").ok();
    writeln!(output, "     → Primary and context gestures must differ").ok();
    writeln!(output, "     → refresh_hz must be between 1 and 1000").ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Gesture Pointer Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while running the session.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
    writeln!(output).ok();
    writeln!(output, "Troubleshooting:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Re-run with -vv and check the log for the failing step").ok();
    writeln!(output, "  2. Try a known-good recording with --recording").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_error_formatting() {
        let error = anyhow::Error::new(SessionError::CameraUnavailable(
            "permission denied".to_string(),
        ));
        let formatted = format_user_error(&error);
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("Camera Unavailable"));
        assert!(formatted.contains("permission denied"));
    }

    #[test]
    fn test_camera_lost_mid_session_formatting() {
        let error = anyhow::Error::new(SessionError::Stopped(InputError::CameraUnavailable(
            "device unplugged".to_string(),
        )));
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Camera Unavailable"));
        assert!(formatted.contains("device unplugged"));
    }

    #[test]
    fn test_stopped_by_recognizer_is_generic() {
        let error = anyhow::Error::new(SessionError::Stopped(InputError::UnknownFrame(12)));
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Gesture Pointer Error"));
        assert!(formatted.contains("Frame 12"));
    }

    #[test]
    fn test_recording_error_formatting() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = anyhow::Error::new(SessionError::RecordingIo(io)).context("Loading session");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Recording Error"));
        assert!(formatted.contains("--recording"));
    }

    #[test]
    fn test_config_error_formatting() {
        let error = anyhow::anyhow!("Failed to parse config file");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Configuration Error"));
    }

    #[test]
    fn test_generic_error_formatting() {
        let error = anyhow::anyhow!("something odd");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Gesture Pointer Error"));
        assert!(formatted.contains("something odd"));
    }
}

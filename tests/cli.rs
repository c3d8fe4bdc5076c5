//! Binary output contract: summary on stdout, logs and errors on stderr

use std::io::Write;
use std::process::{Command, Output, Stdio};

use gesture_pointer::input::{GestureCategory, Landmark, HAND_LANDMARK_COUNT};
use gesture_pointer::session::{RecordedFrame, Recording};

fn write_recording(labels: &[&str]) -> tempfile::NamedTempFile {
    let frames = labels
        .iter()
        .map(|label| RecordedFrame {
            time: None,
            landmarks: vec![vec![Landmark::new(0.5, 0.5); HAND_LANDMARK_COUNT]],
            gestures: vec![vec![GestureCategory {
                category_name: label.to_string(),
                score: 0.9,
            }]],
        })
        .collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&Recording::new(50, frames)).unwrap();
    write!(file, "{}", json).unwrap();
    file
}

fn run(extra: &[&str]) -> Output {
    let config = tempfile::NamedTempFile::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_gesture-pointer"))
        .arg("--config")
        .arg(config.path())
        .args(extra)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

#[test]
fn test_stdout_is_only_the_summary() {
    let recording = write_recording(&["None", "Closed_Fist", "None"]);
    let output = run(&[
        "--log-format",
        "json",
        "--recording",
        recording.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(summary["stats"]["frames_processed"].as_u64().unwrap() >= 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Frame loop started"));
}

#[test]
fn test_missing_camera_exits_with_error() {
    let output = run(&[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Camera Unavailable"));
}

#[test]
fn test_refresh_override_is_validated() {
    let recording = write_recording(&["None"]);
    let output = run(&[
        "--refresh-hz",
        "0",
        "--recording",
        recording.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

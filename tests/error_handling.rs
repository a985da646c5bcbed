//! Error handling tests.
//!
//! These tests verify that errors carry meaningful messages and that request
//! validation rejects windows no reader can honour.

use std::path::PathBuf;

use keyframe_cache::{FrameWindowRequest, KeyframeError};

fn request(around_time: f64, window: f64) -> FrameWindowRequest {
    FrameWindowRequest {
        file_path: PathBuf::from("input.mp4"),
        around_time,
        stream_index: 0,
        window,
    }
}

#[test]
fn file_open_message_names_path() {
    let error = KeyframeError::FileOpen {
        path: PathBuf::from("missing.mp4"),
        reason: "No such file or directory".into(),
    };
    let message = error.to_string();
    assert!(message.contains("Failed to open media file"), "{message}");
    assert!(message.contains("missing.mp4"), "{message}");
}

#[test]
fn track_out_of_range_message() {
    let error = KeyframeError::VideoTrackOutOfRange {
        track_index: 4,
        track_count: 2,
    };
    assert!(error.to_string().contains("out of range"));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: KeyframeError = io.into();
    assert!(matches!(error, KeyframeError::IoError(_)));
    assert!(error.to_string().starts_with("I/O error"));
}

#[test]
fn negative_window_is_rejected() {
    let result = request(10.0, -1.0).validate();
    match result {
        Err(KeyframeError::InvalidWindow(window)) => assert_eq!(window, -1.0),
        other => panic!("Expected InvalidWindow, got: {other:?}"),
    }
}

#[test]
fn infinite_window_is_rejected() {
    assert!(request(10.0, f64::INFINITY).validate().is_err());
}

#[test]
fn negative_time_is_rejected() {
    let message = request(-5.0, 1.0).validate().unwrap_err().to_string();
    assert!(message.contains("Invalid timestamp"), "{message}");
}

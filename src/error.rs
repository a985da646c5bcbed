//! Error types for the `keyframe-cache` crate.
//!
//! This module defines [`KeyframeError`], the unified error type returned by
//! frame readers and every other fallible operation in the crate. Errors carry
//! enough context (file paths, stream indices, upstream messages) to be logged
//! directly at the fetch boundary.

use std::{io::Error as IoError, path::PathBuf};

#[cfg(feature = "ffmpeg")]
use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `keyframe-cache` operations.
///
/// The scheduler never propagates these to its consumers: a failed fetch is
/// logged and the keyframe collection is left as it was. They surface only
/// from [`FrameReader`](crate::FrameReader) implementations and direct calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeyframeError {
    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the reader.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The selected stream is not a video stream, or the file has none.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The requested stream index is out of range.
    #[error("Video track {track_index} is out of range (file has {track_count} streams)")]
    VideoTrackOutOfRange {
        /// Requested stream index.
        track_index: usize,
        /// Number of streams in the container.
        track_count: usize,
    },

    /// The fetch half-window is negative or not finite.
    #[error("Invalid extract window: {0} seconds")]
    InvalidWindow(f64),

    /// The centre time of a fetch is negative or not finite.
    #[error("Invalid timestamp: {0} seconds")]
    InvalidTimestamp(f64),

    /// A frame reader failed for a reason not covered by another variant.
    #[error("Failed to read frames: {0}")]
    ReadFailed(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading the media file.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// The read was abandoned before it produced a result.
    #[error("Operation cancelled")]
    Cancelled,
}

#[cfg(feature = "ffmpeg")]
impl From<FfmpegError> for KeyframeError {
    fn from(error: FfmpegError) -> Self {
        KeyframeError::FfmpegError(error.to_string())
    }
}

//! The frame-probing collaborator.
//!
//! The cache never touches media files itself. It asks a [`FrameReader`] for
//! the frames inside a time window and keeps the keyframes among them. Hosts
//! plug in whatever prober they already have; with the `ffmpeg` feature the
//! crate ships `FfmpegFrameReader`.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use keyframe_cache::{Frame, FrameReader, FrameWindowRequest, KeyframeError};
//!
//! /// A stream with a keyframe every two seconds.
//! struct FixedGop;
//!
//! #[async_trait]
//! impl FrameReader for FixedGop {
//!     async fn read_frames_around_time(
//!         &self,
//!         request: &FrameWindowRequest,
//!     ) -> Result<Vec<Frame>, KeyframeError> {
//!         let start = request.start().ceil() as i64;
//!         let end = request.end().floor() as i64;
//!         Ok((start..=end).map(|s| Frame::new(s as f64, s % 2 == 0)).collect())
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::KeyframeError;
use crate::frame::Frame;

/// A windowed frame read: every frame of one stream within
/// `window` seconds of `around_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameWindowRequest {
    /// Media file to probe.
    pub file_path: PathBuf,
    /// Centre of the window, in seconds.
    pub around_time: f64,
    /// Container-level index of the video stream.
    pub stream_index: usize,
    /// Half-width of the window, in seconds.
    pub window: f64,
}

impl FrameWindowRequest {
    /// Window start, clamped at zero.
    pub fn start(&self) -> f64 {
        (self.around_time - self.window).max(0.0)
    }

    /// Window end.
    pub fn end(&self) -> f64 {
        self.around_time + self.window
    }

    /// Reject windows a reader cannot honour.
    pub fn validate(&self) -> Result<(), KeyframeError> {
        if !self.window.is_finite() || self.window < 0.0 {
            return Err(KeyframeError::InvalidWindow(self.window));
        }
        if !self.around_time.is_finite() || self.around_time < 0.0 {
            return Err(KeyframeError::InvalidTimestamp(self.around_time));
        }
        Ok(())
    }
}

/// Source of frame metadata for a time window.
///
/// Calls may take arbitrarily long and are never preempted by the scheduler:
/// once started, a read runs to completion even if its result is going to be
/// discarded.
#[async_trait]
pub trait FrameReader: Send + Sync {
    /// Read every frame (keyframe or not) of `request.stream_index` inside
    /// the requested window.
    async fn read_frames_around_time(
        &self,
        request: &FrameWindowRequest,
    ) -> Result<Vec<Frame>, KeyframeError>;
}

#[async_trait]
impl<R: FrameReader + ?Sized> FrameReader for Arc<R> {
    async fn read_frames_around_time(
        &self,
        request: &FrameWindowRequest,
    ) -> Result<Vec<Frame>, KeyframeError> {
        (**self).read_frames_around_time(request).await
    }
}

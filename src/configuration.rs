//! Scheduler configuration and timeline input.
//!
//! [`SchedulerOptions`] is a builder for the fixed tuning of a
//! [`KeyframeFetchScheduler`](crate::KeyframeFetchScheduler): cache capacity
//! and debounce interval. [`TimelineState`] is the tuple of UI-supplied inputs
//! the scheduler reacts to; every change is fed in as a whole new value.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use keyframe_cache::{SchedulerOptions, TimelineState, VideoStream};
//!
//! let options = SchedulerOptions::new()
//!     .with_max_keyframes(500)
//!     .with_debounce_interval(Duration::from_millis(250));
//!
//! let state = TimelineState::new("input.mp4", VideoStream::new(0))
//!     .with_commanded_time(12.5)
//!     .with_detected_fps(Some(29.97));
//! assert!(state.fetch_window().is_some());
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::frame::{MediaIdentity, VideoStream};
use crate::reader::FrameWindowRequest;
use crate::store::DEFAULT_MAX_KEYFRAMES;

/// Default quiet period before a fetch is issued.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_millis(500);

/// Default fetch half-window, in seconds.
pub const DEFAULT_EXTRACT_WINDOW: f64 = 60.0;

/// Tuning for a [`KeyframeFetchScheduler`](crate::KeyframeFetchScheduler).
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerOptions {
    pub(crate) max_keyframes: usize,
    pub(crate) debounce_interval: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerOptions {
    /// Defaults: 1000 keyframes, 500 ms debounce.
    pub fn new() -> Self {
        Self {
            max_keyframes: DEFAULT_MAX_KEYFRAMES,
            debounce_interval: DEFAULT_DEBOUNCE_INTERVAL,
        }
    }

    /// Set the cache capacity. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_max_keyframes(mut self, max_keyframes: usize) -> Self {
        self.max_keyframes = max_keyframes.max(1);
        self
    }

    /// Set how long the timeline must stay still before a fetch starts.
    #[must_use]
    pub fn with_debounce_interval(mut self, interval: Duration) -> Self {
        self.debounce_interval = interval;
        self
    }

    /// Cache capacity.
    pub fn max_keyframes(&self) -> usize {
        self.max_keyframes
    }

    /// Debounce interval.
    pub fn debounce_interval(&self) -> Duration {
        self.debounce_interval
    }
}

/// Inputs supplied by the timeline UI.
///
/// A fetch is only issued when keyframes are enabled and a file, a video
/// stream and a commanded time are all present.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineState {
    /// Master switch. When `false`, no fetch is ever issued.
    pub keyframes_enabled: bool,
    /// Loaded media file.
    pub file_path: Option<PathBuf>,
    /// Playhead position the user asked for, in seconds.
    pub commanded_time: Option<f64>,
    /// Selected video stream.
    pub video_stream: Option<VideoStream>,
    /// Frame rate used to widen nearest-keyframe matches by one frame.
    pub detected_fps: Option<f64>,
    /// Half-width of each fetch, in seconds.
    pub extract_window: f64,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            keyframes_enabled: true,
            file_path: None,
            commanded_time: None,
            video_stream: None,
            detected_fps: None,
            extract_window: DEFAULT_EXTRACT_WINDOW,
        }
    }
}

impl TimelineState {
    /// State for a loaded file with a selected stream, playhead unset.
    pub fn new<P: AsRef<Path>>(file_path: P, video_stream: VideoStream) -> Self {
        Self {
            file_path: Some(file_path.as_ref().to_path_buf()),
            video_stream: Some(video_stream),
            ..Self::default()
        }
    }

    /// Move the playhead.
    #[must_use]
    pub fn with_commanded_time(mut self, time: f64) -> Self {
        self.commanded_time = Some(time);
        self
    }

    /// Toggle fetching.
    #[must_use]
    pub fn with_keyframes_enabled(mut self, enabled: bool) -> Self {
        self.keyframes_enabled = enabled;
        self
    }

    /// Set the detected frame rate.
    #[must_use]
    pub fn with_detected_fps(mut self, fps: Option<f64>) -> Self {
        self.detected_fps = fps;
        self
    }

    /// Set the fetch half-window in seconds.
    #[must_use]
    pub fn with_extract_window(mut self, window: f64) -> Self {
        self.extract_window = window;
        self
    }

    /// The (file, stream) pair this state refers to.
    pub fn media_identity(&self) -> MediaIdentity {
        MediaIdentity::new(self.file_path.as_deref(), self.video_stream.as_ref())
    }

    /// `true` when `other` differs from `self` in the detected frame rate and
    /// nothing else.
    pub fn differs_only_in_fps(&self, other: &TimelineState) -> bool {
        self.detected_fps != other.detected_fps
            && *self
                == TimelineState {
                    detected_fps: self.detected_fps,
                    ..other.clone()
                }
    }

    /// The fetch this state asks for, or `None` if a gating input is missing.
    pub fn fetch_window(&self) -> Option<FrameWindowRequest> {
        if !self.keyframes_enabled {
            return None;
        }
        let file_path = self.file_path.clone()?;
        let stream = self.video_stream.as_ref()?;
        let around_time = self.commanded_time?;

        Some(FrameWindowRequest {
            file_path,
            around_time,
            stream_index: stream.index,
            window: self.extract_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_clamp_capacity() {
        assert_eq!(SchedulerOptions::new().with_max_keyframes(0).max_keyframes(), 1);
    }

    #[test]
    fn gating_requires_every_input() {
        let state = TimelineState::new("a.mp4", VideoStream::new(0));
        assert!(state.fetch_window().is_none(), "no commanded time");

        let state = state.with_commanded_time(3.0);
        let request = state.fetch_window().expect("request");
        assert_eq!(request.stream_index, 0);
        assert_eq!(request.around_time, 3.0);

        let disabled = state.clone().with_keyframes_enabled(false);
        assert!(disabled.fetch_window().is_none());

        let no_stream = TimelineState {
            video_stream: None,
            ..state
        };
        assert!(no_stream.fetch_window().is_none());
    }

    #[test]
    fn fps_only_difference() {
        let base = TimelineState::new("a.mp4", VideoStream::new(0))
            .with_commanded_time(3.0)
            .with_detected_fps(Some(25.0));

        assert!(base.differs_only_in_fps(&base.clone().with_detected_fps(Some(30.0))));
        assert!(base.differs_only_in_fps(&base.clone().with_detected_fps(None)));
        assert!(!base.differs_only_in_fps(&base));
        assert!(!base.differs_only_in_fps(
            &base.clone().with_detected_fps(Some(30.0)).with_commanded_time(4.0)
        ));
    }
}

//! Frame records and media identity.
//!
//! A [`Frame`] is the unit a [`FrameReader`](crate::FrameReader) produces:
//! a media-relative timestamp, a keyframe flag and a creation stamp used to
//! order eviction. [`MediaIdentity`] pairs a file with the selected video
//! stream and scopes the validity of every cached frame.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide source of creation stamps. Starts at 1 so that 0 never
/// appears on a stamped frame.
static NEXT_CREATED_AT: AtomicU64 = AtomicU64::new(1);

/// Draw the next creation stamp.
///
/// Stamps are strictly increasing across the whole process, so sorting by
/// them gives insertion order even for frames produced by different readers.
pub fn next_created_at() -> u64 {
    NEXT_CREATED_AT.fetch_add(1, Ordering::Relaxed)
}

/// Metadata for a single frame of a video stream.
///
/// # Example
///
/// ```
/// use keyframe_cache::Frame;
///
/// let first = Frame::new(1.0, true);
/// let second = Frame::new(2.0, false);
/// assert!(first.created_at < second.created_at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Presentation time in seconds, relative to the start of the media.
    pub time: f64,
    /// Whether the frame is independently decodable (a seek anchor).
    pub keyframe: bool,
    /// Monotonic insertion-order stamp. Only used to pick eviction victims.
    pub created_at: u64,
}

impl Frame {
    /// Create a frame stamped with the next process-wide creation stamp.
    pub fn new(time: f64, keyframe: bool) -> Self {
        Self {
            time,
            keyframe,
            created_at: next_created_at(),
        }
    }

    /// Create a frame with an explicit creation stamp.
    pub fn with_created_at(time: f64, keyframe: bool, created_at: u64) -> Self {
        Self {
            time,
            keyframe,
            created_at,
        }
    }

    /// The collection key for this frame.
    pub(crate) fn key(&self) -> TimeKey {
        TimeKey::from_seconds(self.time)
    }
}

/// Exact-equality key for a frame time.
///
/// Two times collide only when their `f64` bit patterns match. `-0.0` is
/// folded onto `0.0`; every other value keeps its exact representation, so
/// times that differ in the last ulp are distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TimeKey(u64);

impl TimeKey {
    pub(crate) fn from_seconds(seconds: f64) -> Self {
        if seconds == 0.0 {
            Self(0.0f64.to_bits())
        } else {
            Self(seconds.to_bits())
        }
    }
}

/// A selected video stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoStream {
    /// Container-level stream index handed to the frame reader.
    pub index: usize,
    /// Codec name, if the host knows it. Informational only.
    pub codec: Option<String>,
}

impl VideoStream {
    /// A stream selector carrying only an index.
    pub fn new(index: usize) -> Self {
        Self { index, codec: None }
    }
}

/// The (file, stream) pair that scopes the validity of cached keyframes.
///
/// Changing either half invalidates every cached entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaIdentity {
    /// Path of the media file, if one is loaded.
    pub file_path: Option<PathBuf>,
    /// Selected video stream, if any.
    pub video_stream: Option<VideoStream>,
}

impl MediaIdentity {
    /// Build an identity from its two halves.
    pub fn new(file_path: Option<&Path>, video_stream: Option<&VideoStream>) -> Self {
        Self {
            file_path: file_path.map(Path::to_path_buf),
            video_stream: video_stream.cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_increase() {
        let a = next_created_at();
        let b = next_created_at();
        assert!(b > a);
    }

    #[test]
    fn negative_zero_shares_key_with_zero() {
        assert_eq!(TimeKey::from_seconds(-0.0), TimeKey::from_seconds(0.0));
    }

    #[test]
    fn nearby_times_do_not_collide() {
        let a = 0.1 + 0.2;
        let b = 0.3;
        assert_ne!(TimeKey::from_seconds(a), TimeKey::from_seconds(b));
    }

    #[test]
    fn identity_tracks_stream_change() {
        let path = Path::new("movie.mp4");
        let first = MediaIdentity::new(Some(path), Some(&VideoStream::new(0)));
        let second = MediaIdentity::new(Some(path), Some(&VideoStream::new(1)));
        assert_ne!(first, second);
    }
}

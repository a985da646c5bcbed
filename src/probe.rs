//! FFmpeg-backed frame reader.
//!
//! [`FfmpegFrameReader`] answers windowed frame reads by demuxing packets of
//! one video stream, without decoding. It seeks to the start of the window
//! (container-level seeks land on the preceding keyframe), then walks packets
//! until it has passed the end of the window. Each packet becomes a
//! [`Frame`] carrying its presentation time and keyframe flag.
//!
//! Requires the `ffmpeg` feature.
//!
//! # Example
//!
//! ```no_run
//! use keyframe_cache::{FfmpegFrameReader, FrameReader, FrameWindowRequest, KeyframeError};
//!
//! # async fn example() -> Result<(), KeyframeError> {
//! let request = FrameWindowRequest {
//!     file_path: "input.mp4".into(),
//!     around_time: 30.0,
//!     stream_index: 0,
//!     window: 5.0,
//! };
//! let frames = FfmpegFrameReader::new().read_frames_around_time(&request).await?;
//! let keyframes = frames.iter().filter(|f| f.keyframe).count();
//! println!("{keyframes} keyframes between 25s and 35s");
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use ffmpeg_next::{Error as FfmpegError, Packet, Rational, media::Type};

use crate::error::KeyframeError;
use crate::frame::Frame;
use crate::reader::{FrameReader, FrameWindowRequest};

/// Reads frame metadata with FFmpeg on Tokio's blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegFrameReader;

impl FfmpegFrameReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameReader for FfmpegFrameReader {
    async fn read_frames_around_time(
        &self,
        request: &FrameWindowRequest,
    ) -> Result<Vec<Frame>, KeyframeError> {
        request.validate()?;
        let request = request.clone();

        tokio::task::spawn_blocking(move || read_window_blocking(&request))
            .await
            .map_err(|error| {
                if error.is_cancelled() {
                    KeyframeError::Cancelled
                } else {
                    KeyframeError::ReadFailed(error.to_string())
                }
            })?
    }
}

/// Blocking window read. Runs on a `spawn_blocking` thread.
pub(crate) fn read_window_blocking(
    request: &FrameWindowRequest,
) -> Result<Vec<Frame>, KeyframeError> {
    let path = &request.file_path;
    log::debug!(
        "Probing {} stream {} over [{:.3}s, {:.3}s]",
        path.display(),
        request.stream_index,
        request.start(),
        request.end(),
    );

    ffmpeg_next::init().map_err(|error| KeyframeError::FileOpen {
        path: path.clone(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })?;
    let mut input_context =
        ffmpeg_next::format::input(path).map_err(|error| KeyframeError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

    let track_count = input_context.nb_streams() as usize;
    let stream = input_context
        .stream(request.stream_index)
        .ok_or(KeyframeError::VideoTrackOutOfRange {
            track_index: request.stream_index,
            track_count,
        })?;
    if stream.parameters().medium() != Type::Video {
        return Err(KeyframeError::NoVideoStream);
    }
    let time_base = stream.time_base();

    let (start, end) = (request.start(), request.end());
    let seek_timestamp = seconds_to_seek_timestamp(start);
    input_context.seek(seek_timestamp, ..seek_timestamp)?;

    let mut frames = Vec::new();
    let mut packet = Packet::empty();
    loop {
        match packet.read(&mut input_context) {
            Ok(()) => {
                if packet.stream() != request.stream_index {
                    continue;
                }
                let Some(timestamp) = packet.pts().or_else(|| packet.dts()) else {
                    continue;
                };
                let time = timestamp_to_seconds(timestamp, time_base);
                let keyframe = packet.is_key();

                // Packets arrive in decode order; a keyframe past the end
                // starts a group that lies entirely outside the window.
                if time > end && keyframe {
                    break;
                }
                if time >= start && time <= end {
                    frames.push(Frame::new(time, keyframe));
                }
            }
            Err(FfmpegError::Eof) => break,
            Err(error) => return Err(KeyframeError::from(error)),
        }
    }

    log::debug!(
        "Read {} frames ({} keyframes) from {}",
        frames.len(),
        frames.iter().filter(|f| f.keyframe).count(),
        path.display(),
    );
    Ok(frames)
}

/// Container-level seek target in AV_TIME_BASE (microseconds).
fn seconds_to_seek_timestamp(seconds: f64) -> i64 {
    (seconds.max(0.0) * 1_000_000.0) as i64
}

/// Rescale a stream timestamp to seconds.
fn timestamp_to_seconds(timestamp: i64, time_base: Rational) -> f64 {
    timestamp as f64 * time_base.numerator() as f64 / time_base.denominator().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_timestamp_is_microseconds() {
        assert_eq!(seconds_to_seek_timestamp(1.5), 1_500_000);
        assert_eq!(seconds_to_seek_timestamp(-2.0), 0);
    }

    #[test]
    fn timestamps_rescale_with_time_base() {
        assert_eq!(timestamp_to_seconds(90_000, Rational::new(1, 90_000)), 1.0);
        assert_eq!(timestamp_to_seconds(50, Rational::new(1, 25)), 2.0);
    }
}

//! # keyframe-cache
//!
//! A windowed keyframe cache for media timelines.
//!
//! Seeking and scrubbing UIs want to snap the playhead to keyframes, but
//! probing a media file on every time update is far too slow. `keyframe-cache`
//! keeps the keyframes near the playhead in memory, refreshes them in the
//! background once scrubbing settles, and answers "where is the nearest
//! keyframe in this direction?" synchronously.
//!
//! ## Quick Start
//!
//! ```no_run
//! use keyframe_cache::{
//!     KeyframeFetchScheduler, SchedulerOptions, SeekDirection, TimelineState, VideoStream,
//! };
//! # use keyframe_cache::{Frame, FrameReader, FrameWindowRequest, KeyframeError};
//! # struct Prober;
//! # #[async_trait::async_trait]
//! # impl FrameReader for Prober {
//! #     async fn read_frames_around_time(&self, _: &FrameWindowRequest)
//! #         -> Result<Vec<Frame>, KeyframeError> { Ok(Vec::new()) }
//! # }
//!
//! # async fn example() {
//! let scheduler = KeyframeFetchScheduler::new(Prober, SchedulerOptions::new());
//!
//! // Feed every playhead / file / stream change.
//! let timeline = TimelineState::new("input.mp4", VideoStream::new(0))
//!     .with_commanded_time(12.0)
//!     .with_detected_fps(Some(25.0));
//! scheduler.on_time_or_config_change(timeline);
//!
//! // Later, when the user presses "next keyframe":
//! if let Some(frame) = scheduler.find_nearest_keyframe_time(12.0, SeekDirection::Forward) {
//!     println!("jump to {:.3}s", frame.time);
//! }
//! # }
//! ```
//!
//! ## Components
//!
//! - [`KeyframeStore`]: bounded, deduplicated keyframe set with oldest-first
//!   eviction.
//! - [`KeyframeFetchScheduler`]: debounces timeline changes, keeps at most
//!   one read in flight, merges results and resets on file or stream change.
//! - [`find_nearest_keyframe`]: directional nearest search with a one-frame
//!   tolerance.
//! - [`FrameReader`]: the probing collaborator. Bring your own, or enable
//!   the `ffmpeg` feature for `FfmpegFrameReader`.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ffmpeg` | `FfmpegFrameReader`, a packet-level reader built on `ffmpeg-next` |
//!
//! The crate logs through the [`log`](https://crates.io/crates/log) facade
//! and never installs a logger itself.

pub mod configuration;
pub mod debounce;
pub mod error;
pub mod frame;
pub mod nearest;
#[cfg(feature = "ffmpeg")]
pub mod probe;
pub mod reader;
pub mod scheduler;
pub mod store;

pub use configuration::{
    DEFAULT_DEBOUNCE_INTERVAL, DEFAULT_EXTRACT_WINDOW, SchedulerOptions, TimelineState,
};
pub use debounce::Debouncer;
pub use error::KeyframeError;
pub use frame::{Frame, MediaIdentity, VideoStream, next_created_at};
pub use nearest::{SeekDirection, find_nearest_keyframe};
#[cfg(feature = "ffmpeg")]
pub use probe::FfmpegFrameReader;
pub use reader::{FrameReader, FrameWindowRequest};
pub use scheduler::{KeyframeFetchScheduler, KeyframeSnapshot, KeyframeStream, SchedulerPhase};
pub use store::{DEFAULT_MAX_KEYFRAMES, KeyframeStore};

//! Debounced, non-overlapping keyframe population.
//!
//! [`KeyframeFetchScheduler`] sits between a timeline UI and a
//! [`FrameReader`]. Every playhead or configuration change is fed in through
//! [`on_time_or_config_change`](KeyframeFetchScheduler::on_time_or_config_change).
//! Once the input has been quiet for the debounce interval the scheduler
//! reads the frames around the latest commanded time, keeps the keyframes and
//! merges them into its [`KeyframeStore`]. At most one read is ever in
//! flight; a debounce that fires while one is running is dropped, not queued.
//!
//! Switching file or video stream clears the cache immediately, and any read
//! still running for the previous media is allowed to finish but its result
//! is thrown away.
//!
//! # Example
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
//! let mut updates = scheduler.subscribe();
//!
//! scheduler.on_time_or_config_change(
//!     TimelineState::new("input.mp4", VideoStream::new(0)).with_commanded_time(42.0),
//! );
//!
//! updates.changed().await.unwrap();
//! let next = scheduler.find_nearest_keyframe_time(42.0, SeekDirection::Forward);
//! println!("next keyframe: {:?}", next.map(|f| f.time));
//! # }
//! ```

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

use crate::configuration::{SchedulerOptions, TimelineState};
use crate::debounce::Debouncer;
use crate::frame::{Frame, MediaIdentity};
use crate::nearest::SeekDirection;
use crate::reader::{FrameReader, FrameWindowRequest};
use crate::store::KeyframeStore;

/// Snapshot of the cached keyframes, republished after every change.
pub type KeyframeSnapshot = Arc<Vec<Frame>>;

/// Where the scheduler is in its debounce / fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Nothing pending, nothing running.
    Idle,
    /// Waiting for the input to go quiet.
    Debouncing,
    /// A frame read is outstanding.
    Fetching,
}

/// Debounced keyframe fetcher and cache for one timeline session.
///
/// Dropping the scheduler cancels any pending debounce and discards the
/// result of a read that is still running.
pub struct KeyframeFetchScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    reader: Arc<dyn FrameReader>,
    runtime: Handle,
    state: Mutex<SchedulerState>,
    updates: watch::Sender<KeyframeSnapshot>,
}

struct SchedulerState {
    store: KeyframeStore,
    debouncer: Debouncer,
    latest: TimelineState,
    identity: Option<MediaIdentity>,
    /// Bumped on reset and cancellation; a read only applies its result if
    /// the generation it started under is still current.
    generation: u64,
    in_flight: bool,
}

impl KeyframeFetchScheduler {
    /// Create a scheduler that spawns its timers and reads on the current
    /// Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime. Use
    /// [`with_runtime`](KeyframeFetchScheduler::with_runtime) from other
    /// threads.
    pub fn new<R>(reader: R, options: SchedulerOptions) -> Self
    where
        R: FrameReader + 'static,
    {
        Self::with_runtime(reader, options, Handle::current())
    }

    /// Create a scheduler that spawns its timers and reads on `runtime`.
    pub fn with_runtime<R>(reader: R, options: SchedulerOptions, runtime: Handle) -> Self
    where
        R: FrameReader + 'static,
    {
        let (updates, _) = watch::channel(Arc::new(Vec::new()));
        let state = SchedulerState {
            store: KeyframeStore::new(options.max_keyframes),
            debouncer: Debouncer::new(options.debounce_interval, runtime.clone()),
            latest: TimelineState::default(),
            identity: None,
            generation: 0,
            in_flight: false,
        };

        Self {
            shared: Arc::new(Shared {
                reader: Arc::new(reader),
                runtime,
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    /// Feed the latest timeline inputs.
    ///
    /// Restarts the debounce timer; only the values of the last call before
    /// the timer fires are used. A change of file or video stream clears the
    /// cache before returning. A change of `detected_fps` alone only updates
    /// the frame rate used by lookups and does not restart the timer.
    pub fn on_time_or_config_change(&self, timeline: TimelineState) {
        let mut state = self.shared.lock_state();
        if state.latest.differs_only_in_fps(&timeline) {
            state.latest.detected_fps = timeline.detected_fps;
            return;
        }

        let identity = timeline.media_identity();
        if state.identity.as_ref() != Some(&identity) {
            log::debug!(
                "Media identity changed to {:?} (stream {:?}), resetting keyframes",
                identity.file_path,
                identity.video_stream.as_ref().map(|s| s.index),
            );
            state.identity = Some(identity);
            self.shared.reset_locked(&mut state);
        }
        state.latest = timeline;

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        state.debouncer.schedule(move |sequence| {
            if let Some(shared) = weak.upgrade() {
                Shared::on_debounce_elapsed(&shared, sequence);
            }
        });
    }

    /// Clear the cache and discard the result of any running read.
    pub fn reset(&self) {
        let mut state = self.shared.lock_state();
        self.shared.reset_locked(&mut state);
    }

    /// Drop the pending debounce and discard the result of any running read.
    ///
    /// The cache keeps its contents. The next
    /// [`on_time_or_config_change`](Self::on_time_or_config_change) starts a
    /// new cycle.
    pub fn cancel(&self) {
        let mut state = self.shared.lock_state();
        state.debouncer.cancel();
        state.generation += 1;
    }

    /// Current phase of the debounce / fetch cycle.
    ///
    /// A read in flight takes precedence over a pending debounce.
    pub fn phase(&self) -> SchedulerPhase {
        let state = self.shared.lock_state();
        if state.in_flight {
            SchedulerPhase::Fetching
        } else if state.debouncer.is_pending() {
            SchedulerPhase::Debouncing
        } else {
            SchedulerPhase::Idle
        }
    }

    /// Whether a frame read is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.shared.lock_state().in_flight
    }

    /// The cached keyframes for the active media, in no particular order.
    pub fn neighbouring_keyframes(&self) -> Vec<Frame> {
        self.shared.lock_state().store.frames()
    }

    /// Number of cached keyframes.
    pub fn keyframe_count(&self) -> usize {
        self.shared.lock_state().store.len()
    }

    /// Nearest cached keyframe to `time` in `direction`, using the most
    /// recently reported frame rate to widen matches by one frame.
    pub fn find_nearest_keyframe_time(&self, time: f64, direction: SeekDirection) -> Option<Frame> {
        let state = self.shared.lock_state();
        state
            .store
            .find_nearest(time, direction, state.latest.detected_fps)
    }

    /// Watch the cached keyframes. The receiver starts with the current
    /// snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<KeyframeSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Stream of keyframe snapshots, starting with the current one.
    pub fn keyframe_stream(&self) -> KeyframeStream {
        KeyframeStream {
            inner: WatchStream::new(self.subscribe()),
        }
    }
}

impl Drop for KeyframeFetchScheduler {
    fn drop(&mut self) {
        let mut state = self.shared.lock_state();
        state.debouncer.cancel();
        state.generation += 1;
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reset_locked(&self, state: &mut SchedulerState) {
        state.store.reset();
        state.generation += 1;
        self.publish(&state.store);
    }

    fn publish(&self, store: &KeyframeStore) {
        self.updates.send_replace(Arc::new(store.frames()));
    }

    /// Debounce timer callback: start a read if every gate holds.
    fn on_debounce_elapsed(shared: &Arc<Shared>, sequence: u64) {
        let mut state = shared.lock_state();
        if !state.debouncer.complete(sequence) {
            return;
        }

        let Some(request) = state.latest.fetch_window() else {
            log::trace!("Keyframe fetch gated off (disabled or missing file/stream/time)");
            return;
        };
        if state.in_flight {
            log::trace!("Keyframe fetch already in flight, dropping debounce #{sequence}");
            return;
        }

        state.in_flight = true;
        let guard = InFlightGuard {
            shared: Arc::clone(shared),
        };
        let generation = state.generation;
        drop(state);

        log::debug!(
            "Reading frames around {:.3}s (window={}s, stream={}) from {}",
            request.around_time,
            request.window,
            request.stream_index,
            request.file_path.display(),
        );
        shared
            .runtime
            .spawn(Shared::run_fetch(guard, request, generation));
    }

    async fn run_fetch(guard: InFlightGuard, request: FrameWindowRequest, generation: u64) {
        let shared = &guard.shared;
        match shared.reader.read_frames_around_time(&request).await {
            Ok(frames) => shared.apply(generation, frames),
            Err(err) => log::error!("Failed to read keyframes: {err}"),
        }
    }

    fn apply(&self, generation: u64, frames: Vec<Frame>) {
        let keyframes: Vec<Frame> = frames.into_iter().filter(|f| f.keyframe).collect();

        let mut state = self.lock_state();
        if state.generation != generation {
            log::trace!("Discarding {} keyframes from a stale read", keyframes.len());
            return;
        }

        state.store.merge_insert(&keyframes);
        log::debug!(
            "Merged {} keyframes ({} cached)",
            keyframes.len(),
            state.store.len()
        );
        self.publish(&state.store);
    }
}

/// Clears the in-flight marker when a read ends, however it ends.
struct InFlightGuard {
    shared: Arc<Shared>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.shared.lock_state().in_flight = false;
    }
}

/// A [`Stream`] of keyframe snapshots.
///
/// Yields the current snapshot first, then one item per change. Intermediate
/// snapshots published faster than the consumer polls are skipped.
pub struct KeyframeStream {
    inner: WatchStream<KeyframeSnapshot>,
}

impl Stream for KeyframeStream {
    type Item = KeyframeSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

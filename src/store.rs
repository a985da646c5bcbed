//! Bounded keyframe collection.
//!
//! [`KeyframeStore`] holds the keyframes known for the active media identity,
//! keyed by their exact time. Newly fetched batches are merged over the
//! existing entries; once the store is full, the oldest entries (by
//! [`Frame::created_at`]) make room for the incoming batch.
//!
//! # Example
//!
//! ```
//! use keyframe_cache::{Frame, KeyframeStore, SeekDirection};
//!
//! let mut store = KeyframeStore::new(1000);
//! store.merge_insert(&[Frame::new(10.0, true), Frame::new(20.0, true)]);
//!
//! let previous = store.find_nearest(19.0, SeekDirection::Backward, Some(25.0));
//! assert_eq!(previous.map(|f| f.time), Some(10.0));
//! ```

use std::collections::HashMap;

use crate::frame::{Frame, TimeKey};
use crate::nearest::{SeekDirection, find_nearest_keyframe};

/// Default upper bound on the number of cached keyframes.
pub const DEFAULT_MAX_KEYFRAMES: usize = 1000;

/// A deduplicated, size-bounded set of keyframes for one media identity.
///
/// Keys are exact `f64` times: two frames overwrite each other only when
/// their times are bit-identical (with `-0.0` treated as `0.0`). Times that a
/// reader reports with slightly different rounding across batches therefore
/// coexist as separate entries.
#[derive(Debug, Clone)]
pub struct KeyframeStore {
    frames: HashMap<TimeKey, Frame>,
    max_keyframes: usize,
}

impl Default for KeyframeStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYFRAMES)
    }
}

impl KeyframeStore {
    /// Create an empty store holding at most `max_keyframes` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_keyframes: usize) -> Self {
        Self {
            frames: HashMap::new(),
            max_keyframes: max_keyframes.max(1),
        }
    }

    /// Configured capacity.
    pub fn max_keyframes(&self) -> usize {
        self.max_keyframes
    }

    /// Number of cached keyframes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every cached entry.
    pub fn reset(&mut self) {
        self.frames.clear();
    }

    /// Look up the entry stored at exactly `time`.
    pub fn get(&self, time: f64) -> Option<&Frame> {
        self.frames.get(&TimeKey::from_seconds(time))
    }

    /// Iterate over the cached frames in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }

    /// Snapshot of the cached frames in no particular order.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.values().copied().collect()
    }

    /// Snapshot of the cached frames ordered by time, for timeline drawing.
    pub fn sorted_frames(&self) -> Vec<Frame> {
        let mut frames = self.frames();
        frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        frames
    }

    /// Merge a batch of keyframes into the store.
    ///
    /// The caller guarantees every frame in `new_frames` is a keyframe.
    ///
    /// When the store is already at capacity, exactly `new_frames.len()` of
    /// the oldest entries are evicted first, even if some incoming frames
    /// would have replaced existing keys anyway. Incoming frames then
    /// overwrite surviving entries with the same time. If the merged result
    /// still exceeds capacity (a large batch landing on a nearly full store),
    /// the oldest entries are trimmed until it fits.
    pub fn merge_insert(&mut self, new_frames: &[Frame]) {
        if new_frames.is_empty() {
            return;
        }

        if self.frames.len() >= self.max_keyframes {
            self.evict_oldest(new_frames.len());
        }

        for frame in new_frames {
            self.frames.insert(frame.key(), *frame);
        }

        if self.frames.len() > self.max_keyframes {
            let excess = self.frames.len() - self.max_keyframes;
            log::trace!("Trimming {} keyframes above capacity", excess);
            self.evict_oldest(excess);
        }
    }

    /// Find the cached keyframe nearest to `time` in `direction`.
    ///
    /// See [`find_nearest_keyframe`] for the matching rules.
    pub fn find_nearest(
        &self,
        time: f64,
        direction: SeekDirection,
        fps: Option<f64>,
    ) -> Option<Frame> {
        find_nearest_keyframe(self.frames.values(), time, direction, fps)
    }

    /// Remove up to `count` entries with the smallest creation stamps.
    fn evict_oldest(&mut self, count: usize) {
        if count >= self.frames.len() {
            self.frames.clear();
            return;
        }

        let mut by_age: Vec<(u64, f64, TimeKey)> = self
            .frames
            .iter()
            .map(|(key, frame)| (frame.created_at, frame.time, *key))
            .collect();
        by_age.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

        for (_, _, key) in by_age.into_iter().take(count) {
            self.frames.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(KeyframeStore::new(0).max_keyframes(), 1);
    }

    #[test]
    fn empty_batch_is_noop() {
        let mut store = KeyframeStore::new(2);
        store.merge_insert(&[Frame::with_created_at(1.0, true, 1)]);
        store.merge_insert(&[Frame::with_created_at(2.0, true, 2)]);
        store.merge_insert(&[]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn evicts_everything_when_batch_exceeds_contents() {
        let mut store = KeyframeStore::new(2);
        store.merge_insert(&[
            Frame::with_created_at(1.0, true, 1),
            Frame::with_created_at(2.0, true, 2),
        ]);
        store.merge_insert(&[
            Frame::with_created_at(3.0, true, 3),
            Frame::with_created_at(4.0, true, 4),
            Frame::with_created_at(5.0, true, 5),
        ]);
        // Old entries are gone; the over-sized batch is trimmed to capacity.
        assert_eq!(store.len(), 2);
        assert!(store.get(4.0).is_some());
        assert!(store.get(5.0).is_some());
    }

    #[test]
    fn collision_after_eviction_shrinks_below_capacity() {
        let mut store = KeyframeStore::new(3);
        store.merge_insert(&[
            Frame::with_created_at(1.0, true, 1),
            Frame::with_created_at(2.0, true, 2),
            Frame::with_created_at(3.0, true, 3),
        ]);
        // Full store: one eviction per incoming frame, even though 3.0 is
        // already present.
        store.merge_insert(&[Frame::with_created_at(3.0, true, 4)]);
        assert_eq!(store.len(), 2);
        assert!(store.get(1.0).is_none());
        assert_eq!(store.get(3.0).map(|f| f.created_at), Some(4));
    }

    #[test]
    fn sorted_frames_orders_by_time() {
        let mut store = KeyframeStore::default();
        store.merge_insert(&[
            Frame::new(3.0, true),
            Frame::new(1.0, true),
            Frame::new(2.0, true),
        ]);
        let times: Vec<f64> = store.sorted_frames().iter().map(|f| f.time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }
}

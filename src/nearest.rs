//! Directional nearest-keyframe search.
//!
//! [`find_nearest_keyframe`] answers "which known keyframe is closest to
//! `time` in this direction?". A candidate that sits less than one frame
//! duration on the wrong side of `time` still counts as being *at* `time`, so
//! a playhead parked a hair after a keyframe can step forward onto it.
//!
//! # Example
//!
//! ```
//! use keyframe_cache::{Frame, SeekDirection, find_nearest_keyframe};
//!
//! let frames = [
//!     Frame::new(10.0, true),
//!     Frame::new(20.0, true),
//!     Frame::new(30.0, true),
//! ];
//! let next = find_nearest_keyframe(&frames, 15.0, SeekDirection::Forward, Some(25.0));
//! assert_eq!(next.map(|f| f.time), Some(20.0));
//! ```

use crate::frame::Frame;

/// Which side of the target time a keyframe may lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekDirection {
    /// At or after the target.
    Forward,
    /// At or before the target.
    Backward,
    /// Either side; the closest wins.
    #[default]
    Auto,
}

impl SeekDirection {
    /// Map a signed step (`+1`, `-1`, `0`) to a direction.
    pub fn from_signum(direction: i32) -> Self {
        match direction {
            d if d > 0 => SeekDirection::Forward,
            d if d < 0 => SeekDirection::Backward,
            _ => SeekDirection::Auto,
        }
    }
}

/// Tolerance, in seconds, below which a candidate is treated as sitting at
/// the target time.
pub(crate) fn frame_epsilon(fps: Option<f64>) -> f64 {
    match fps {
        Some(fps) if fps.is_finite() && fps > 0.0 => 1.0 / fps,
        _ => 0.0,
    }
}

/// Find the keyframe closest to `time` that satisfies `direction`.
///
/// Frames whose `keyframe` flag is unset are ignored. Among equally distant
/// candidates the earlier one wins. Returns `None` when `frames` holds no
/// qualifying keyframe or `time` is NaN.
pub fn find_nearest_keyframe<'a, I>(
    frames: I,
    time: f64,
    direction: SeekDirection,
    fps: Option<f64>,
) -> Option<Frame>
where
    I: IntoIterator<Item = &'a Frame>,
{
    if time.is_nan() {
        return None;
    }
    let epsilon = frame_epsilon(fps);

    let mut best: Option<(f64, Frame)> = None;
    for frame in frames {
        if !frame.keyframe || frame.time.is_nan() {
            continue;
        }
        let admitted = match direction {
            SeekDirection::Forward => frame.time >= time - epsilon,
            SeekDirection::Backward => frame.time <= time + epsilon,
            SeekDirection::Auto => true,
        };
        if !admitted {
            continue;
        }

        let distance = (time - frame.time).abs();
        let better = match &best {
            None => true,
            Some((best_distance, best_frame)) => {
                distance < *best_distance
                    || (distance == *best_distance && frame.time < best_frame.time)
            }
        };
        if better {
            best = Some((distance, *frame));
        }
    }

    best.map(|(_, frame)| frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyframes(times: &[f64]) -> Vec<Frame> {
        times.iter().map(|&t| Frame::new(t, true)).collect()
    }

    #[test]
    fn signum_mapping() {
        assert_eq!(SeekDirection::from_signum(1), SeekDirection::Forward);
        assert_eq!(SeekDirection::from_signum(-3), SeekDirection::Backward);
        assert_eq!(SeekDirection::from_signum(0), SeekDirection::Auto);
    }

    #[test]
    fn epsilon_ignores_bad_fps() {
        assert_eq!(frame_epsilon(None), 0.0);
        assert_eq!(frame_epsilon(Some(0.0)), 0.0);
        assert_eq!(frame_epsilon(Some(f64::NAN)), 0.0);
        assert_eq!(frame_epsilon(Some(25.0)), 0.04);
    }

    #[test]
    fn auto_tie_prefers_earlier() {
        let frames = keyframes(&[20.0, 10.0]);
        let nearest = find_nearest_keyframe(&frames, 15.0, SeekDirection::Auto, None);
        assert_eq!(nearest.map(|f| f.time), Some(10.0));
    }

    #[test]
    fn forward_snaps_within_one_frame() {
        let frames = keyframes(&[10.0, 20.0]);
        let nearest = find_nearest_keyframe(&frames, 10.02, SeekDirection::Forward, Some(25.0));
        assert_eq!(nearest.map(|f| f.time), Some(10.0));

        let nearest = find_nearest_keyframe(&frames, 10.02, SeekDirection::Forward, None);
        assert_eq!(nearest.map(|f| f.time), Some(20.0));
    }

    #[test]
    fn skips_non_keyframes() {
        let frames = vec![Frame::new(14.0, false), Frame::new(20.0, true)];
        let nearest = find_nearest_keyframe(&frames, 15.0, SeekDirection::Auto, None);
        assert_eq!(nearest.map(|f| f.time), Some(20.0));
    }

    #[test]
    fn nan_target_finds_nothing() {
        let frames = keyframes(&[1.0]);
        assert!(find_nearest_keyframe(&frames, f64::NAN, SeekDirection::Auto, None).is_none());
    }
}

//! Nearest-keyframe search tests.

use keyframe_cache::{Frame, KeyframeStore, SeekDirection, find_nearest_keyframe};

fn store_with(times: &[f64]) -> KeyframeStore {
    let mut store = KeyframeStore::default();
    let frames: Vec<Frame> = times.iter().map(|&t| Frame::new(t, true)).collect();
    store.merge_insert(&frames);
    store
}

fn nearest_time(
    store: &KeyframeStore,
    time: f64,
    direction: SeekDirection,
    fps: Option<f64>,
) -> Option<f64> {
    store.find_nearest(time, direction, fps).map(|f| f.time)
}

#[test]
fn forward_picks_next_keyframe() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    assert_eq!(nearest_time(&store, 15.0, SeekDirection::Forward, Some(25.0)), Some(20.0));
}

#[test]
fn backward_picks_previous_keyframe() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    assert_eq!(nearest_time(&store, 25.0, SeekDirection::Backward, None), Some(20.0));
    assert_eq!(nearest_time(&store, 25.0, SeekDirection::Backward, Some(25.0)), Some(20.0));
}

#[test]
fn auto_picks_closest_either_side() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    assert_eq!(nearest_time(&store, 18.0, SeekDirection::Auto, None), Some(20.0));
    assert_eq!(nearest_time(&store, 12.0, SeekDirection::Auto, None), Some(10.0));
}

#[test]
fn auto_tie_goes_to_earlier_keyframe() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    assert_eq!(nearest_time(&store, 25.0, SeekDirection::Auto, None), Some(20.0));
}

#[test]
fn exact_hit_matches_in_every_direction() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    for direction in [SeekDirection::Forward, SeekDirection::Backward, SeekDirection::Auto] {
        assert_eq!(nearest_time(&store, 20.0, direction, Some(25.0)), Some(20.0));
    }
}

#[test]
fn one_frame_tolerance_backward() {
    let store = store_with(&[10.0, 20.0]);
    // 20.0 lies after 19.98 but within one frame (0.04s), so it counts as "at".
    assert_eq!(nearest_time(&store, 19.98, SeekDirection::Backward, Some(25.0)), Some(20.0));
    assert_eq!(nearest_time(&store, 19.98, SeekDirection::Backward, None), Some(10.0));
}

#[test]
fn nothing_in_direction_returns_none() {
    let store = store_with(&[10.0, 20.0, 30.0]);
    assert!(store.find_nearest(31.0, SeekDirection::Forward, Some(25.0)).is_none());
    assert!(store.find_nearest(9.0, SeekDirection::Backward, Some(25.0)).is_none());
}

#[test]
fn empty_collection_returns_none() {
    let store = KeyframeStore::default();
    for direction in [SeekDirection::Forward, SeekDirection::Backward, SeekDirection::Auto] {
        assert!(store.find_nearest(5.0, direction, Some(30.0)).is_none());
        assert!(store.find_nearest(0.0, direction, None).is_none());
    }
}

#[test]
fn store_and_free_function_agree() {
    let store = store_with(&[1.0, 2.5, 4.0, 7.25, 9.0]);
    let frames = store.frames();
    for step in 0..100 {
        let time = step as f64 * 0.1;
        for direction in [SeekDirection::Forward, SeekDirection::Backward, SeekDirection::Auto] {
            assert_eq!(
                store.find_nearest(time, direction, Some(30.0)),
                find_nearest_keyframe(&frames, time, direction, Some(30.0)),
            );
        }
    }
}

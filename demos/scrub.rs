//! Simulate scrubbing a timeline and step between keyframes (feature = "ffmpeg").
//!
//! Usage:
//!   cargo run --features=ffmpeg --example scrub -- <video_path> [stream_index]

use std::error::Error;
use std::time::Duration;

use keyframe_cache::{
    FfmpegFrameReader, KeyframeFetchScheduler, SchedulerOptions, SeekDirection, TimelineState,
    VideoStream,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "input.mp4".to_string());
    let stream_index: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0);

    let scheduler = KeyframeFetchScheduler::new(FfmpegFrameReader::new(), SchedulerOptions::new());
    let mut updates = scheduler.subscribe();

    // A burst of playhead moves: only the last one triggers a read.
    let timeline = TimelineState::new(&path, VideoStream::new(stream_index))
        .with_extract_window(10.0)
        .with_detected_fps(Some(25.0));
    for time in [1.0, 3.0, 5.0, 8.0] {
        scheduler.on_time_or_config_change(timeline.clone().with_commanded_time(time));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!("Waiting for keyframes around 8s in {path}...");
    let snapshot = tokio::time::timeout(
        Duration::from_secs(10),
        updates.wait_for(|frames| !frames.is_empty()),
    )
    .await??
    .clone();

    let mut times: Vec<f64> = snapshot.iter().map(|f| f.time).collect();
    times.sort_by(f64::total_cmp);
    println!("Cached {} keyframes:", times.len());
    for time in times.iter().take(20) {
        println!("  {time:.3}s");
    }

    for direction in [SeekDirection::Backward, SeekDirection::Forward] {
        match scheduler.find_nearest_keyframe_time(8.0, direction) {
            Some(frame) => println!("{direction:?} from 8s: {:.3}s", frame.time),
            None => println!("{direction:?} from 8s: none cached"),
        }
    }

    Ok(())
}

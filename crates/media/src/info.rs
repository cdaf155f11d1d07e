use frameline_state::timecode::MediaTiming;
use frameline_state::Timestamp;

/// Timing metadata for a loaded source, as advertised by the decode layer.
/// Averages only: tick spacing between individual frames may vary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub first_timestamp: Timestamp,
    /// Ticks from the first to the last frame.
    pub duration_ts: i64,
    pub average_ticks_per_frame: i64,
    pub average_ticks_per_second: f64,
    pub fps: f64,
    pub frame_interval_ms: f64,
}

impl VideoInfo {
    /// Metadata for a uniformly spaced source, the common case and the shape
    /// every test source uses.
    pub fn uniform(average_ticks_per_frame: i64, fps: f64, frame_count: i64) -> Self {
        let frame_interval_ms = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
        Self {
            first_timestamp: 0,
            duration_ts: average_ticks_per_frame * (frame_count - 1).max(0),
            average_ticks_per_frame,
            average_ticks_per_second: average_ticks_per_frame as f64 * fps,
            fps,
            frame_interval_ms,
        }
    }

    pub fn last_timestamp(&self) -> Timestamp {
        self.first_timestamp + self.duration_ts
    }

    pub fn timing(&self) -> MediaTiming {
        MediaTiming {
            average_ticks_per_frame: self.average_ticks_per_frame,
            average_ticks_per_second: self.average_ticks_per_second,
            fps: self.fps,
        }
    }
}

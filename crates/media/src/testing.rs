//! Deterministic reader for exercising the scheduler without a decoder.

use std::collections::VecDeque;

use frameline_state::Timestamp;
use image::RgbaImage;

use crate::info::VideoInfo;
use crate::reader::{ReadOutcome, SeekCost, VideoReader};

/// A uniformly spaced in-memory source. Outcomes can be scripted per call;
/// unscripted calls succeed. Every call is logged so tests can assert on
/// what the scheduler actually requested.
pub struct ScriptedReader {
    info: VideoInfo,
    loaded: bool,
    current: Timestamp,
    image: RgbaImage,
    scripted: VecDeque<ReadOutcome>,
    seek_cost: SeekCost,
    /// `(target, frames_to_decode)` per `read_frame` call.
    pub reads: Vec<(Option<Timestamp>, i64)>,
}

impl ScriptedReader {
    pub fn new(average_ticks_per_frame: i64, fps: f64, frame_count: i64) -> Self {
        Self {
            info: VideoInfo::uniform(average_ticks_per_frame, fps, frame_count),
            loaded: true,
            current: 0,
            image: RgbaImage::new(4, 4),
            scripted: VecDeque::new(),
            seek_cost: SeekCost::Expensive,
            reads: Vec::new(),
        }
    }

    pub fn unloaded() -> Self {
        let mut reader = Self::new(40, 25.0, 2);
        reader.loaded = false;
        reader
    }

    /// Forces the outcome of the next unscripted `read_frame` call. Queued
    /// outcomes apply in order.
    pub fn script_outcome(&mut self, outcome: ReadOutcome) {
        self.scripted.push_back(outcome);
    }

    pub fn set_seek_cost(&mut self, cost: SeekCost) {
        self.seek_cost = cost;
    }

    fn snap_to_frame(&self, ts: Timestamp) -> Timestamp {
        let atpf = self.info.average_ticks_per_frame;
        if atpf <= 0 {
            return ts;
        }
        let clamped = ts.clamp(self.info.first_timestamp, self.info.last_timestamp());
        let offset = clamped - self.info.first_timestamp;
        self.info.first_timestamp + (offset / atpf) * atpf
    }
}

impl VideoReader for ScriptedReader {
    fn read_frame(&mut self, target: Option<Timestamp>, frames_to_decode: i64) -> ReadOutcome {
        self.reads.push((target, frames_to_decode));

        if !self.loaded {
            return ReadOutcome::NotLoaded;
        }
        if let Some(outcome) = self.scripted.pop_front() {
            if outcome != ReadOutcome::Success {
                return outcome;
            }
        }

        self.current = match target {
            Some(ts) => self.snap_to_frame(ts),
            None => self.snap_to_frame(
                self.current + frames_to_decode * self.info.average_ticks_per_frame,
            ),
        };
        ReadOutcome::Success
    }

    fn current_timestamp(&self) -> Timestamp {
        self.current
    }

    fn current_image(&self) -> Option<&RgbaImage> {
        if self.loaded {
            Some(&self.image)
        } else {
            None
        }
    }

    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn timestamp_of_frame(&self, frame_index: i64) -> Timestamp {
        self.info.first_timestamp + frame_index.max(0) * self.info.average_ticks_per_frame
    }

    fn seek_cost(&self) -> SeekCost {
        self.seek_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_by_whole_frames() {
        let mut reader = ScriptedReader::new(40, 25.0, 26);
        assert!(reader.read_frame(None, 1).is_success());
        assert_eq!(reader.current_timestamp(), 40);
        assert!(reader.read_frame(None, 3).is_success());
        assert_eq!(reader.current_timestamp(), 160);
        assert!(reader.read_frame(None, -1).is_success());
        assert_eq!(reader.current_timestamp(), 120);
    }

    #[test]
    fn seeks_snap_to_the_frame_grid_and_clamp() {
        let mut reader = ScriptedReader::new(40, 25.0, 26);
        assert!(reader.read_frame(Some(130), 1).is_success());
        assert_eq!(reader.current_timestamp(), 120);
        assert!(reader.read_frame(Some(9_999), 1).is_success());
        assert_eq!(reader.current_timestamp(), 1000);
    }

    #[test]
    fn scripted_outcomes_fire_in_order_without_moving() {
        let mut reader = ScriptedReader::new(40, 25.0, 26);
        reader.script_outcome(ReadOutcome::FrameNotRead);
        reader.script_outcome(ReadOutcome::Success);
        assert_eq!(reader.read_frame(None, 1), ReadOutcome::FrameNotRead);
        assert_eq!(reader.current_timestamp(), 0);
        assert!(reader.read_frame(None, 1).is_success());
        assert_eq!(reader.current_timestamp(), 40);
    }
}

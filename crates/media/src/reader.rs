use frameline_state::Timestamp;
use image::RgbaImage;

use crate::info::VideoInfo;

/// Classification of a frame read. This is deliberately an outcome and not
/// a `Result`: most variants are absorbed by the scheduler (clamp or stop,
/// no retry) rather than propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Success,
    /// No source loaded. Silent no-op for the caller.
    NotLoaded,
    /// Frame buffer allocation failed. Stops playback, logged only.
    AllocationFailed,
    /// Blocking frame or end of file. The scheduler clamps to the selection
    /// end and lets the next tick's boundary logic decide.
    FrameNotRead,
    /// Decoded bytes could not become a displayable image. Fatal, surfaced.
    ConversionFailed,
    /// Anything unclassified. Fatal, surfaced.
    Other,
}

impl ReadOutcome {
    pub fn is_success(self) -> bool {
        self == ReadOutcome::Success
    }
}

/// How expensive arbitrary seeks are for this source. Drives whether scrub
/// controls report on every mouse move or only on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekCost {
    /// In-memory or analysis-backed source, seek freely.
    Cheap,
    /// Disk-streamed source, every seek pays a decode.
    Expensive,
}

/// The decode collaborator. The engine never touches pixels; it asks this
/// trait for "the frame at `target`" or "`frames_to_decode` frames ahead"
/// and reads the resulting position back.
///
/// Implementations are not assumed thread-safe: all calls come from the
/// engine's owning thread.
pub trait VideoReader {
    /// Advances the decoder. `target = Some(ts)` seeks; `None` steps by
    /// `frames_to_decode` frames, which may be negative for backward jogs.
    fn read_frame(&mut self, target: Option<Timestamp>, frames_to_decode: i64) -> ReadOutcome;

    /// Position after the last successful read.
    fn current_timestamp(&self) -> Timestamp;

    /// Frame produced by the last successful read.
    fn current_image(&self) -> Option<&RgbaImage>;

    fn info(&self) -> &VideoInfo;

    fn is_loaded(&self) -> bool;

    /// Exact timestamp of a frame by index, for reconciling selection
    /// bounds after the working zone changes.
    fn timestamp_of_frame(&self, frame_index: i64) -> Timestamp;

    fn seek_cost(&self) -> SeekCost {
        SeekCost::Expensive
    }
}

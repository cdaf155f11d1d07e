pub mod markers;
pub mod playback;
pub mod selection;
pub mod speed;
pub mod timebase;
pub mod timecode;

/// Absolute media time in opaque ticks. Tick spacing is not guaranteed to be
/// uniform between frames, which is why positional state is never expressed
/// as a frame index.
pub type Timestamp = i64;

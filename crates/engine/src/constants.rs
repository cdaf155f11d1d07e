/// Enqueued-frame count past which the scheduler stops accumulating skips
/// and lowers the playback speed by one large step instead.
pub const FRAME_QUEUE_THRESHOLD: i64 = 6;

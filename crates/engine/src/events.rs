use frameline_media::PlaybackError;
use frameline_state::playback::PlayingMode;
use frameline_state::Timestamp;

/// Intents enqueued by the timer worker and by other threads, drained once
/// per [`pump`]. Queueing instead of calling keeps mutation single-threaded
/// and non-re-entrant.
///
/// [`pump`]: crate::PlaybackEngine::pump
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineMsg {
    Tick,
    Play,
    Pause,
    TogglePlay,
    Seek(Timestamp),
    StepForward,
    StepBackward,
    GotoStart,
    GotoEnd,
    SetSlowmotionPercentage(f64),
    SetHighSpeedFactor(f64),
    SetPlayingMode(PlayingMode),
    SetSelection { start: Timestamp, end: Timestamp },
    ResetSelection,
}

/// Why the scheduler left the `Playing` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Paused,
    EndOfRange,
    DecodeError,
}

/// Notifications returned from `pump`. `relayed` marks changes induced by
/// the sync coordinator, which it ignores on the way back to avoid event
/// ping-pong between two synchronized engines.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Started { relayed: bool },
    Stopped { reason: StopReason, relayed: bool },
    PositionChanged(Timestamp),
    Sought { position: Timestamp, relayed: bool },
    SpeedChanged { slowmotion_percentage: f64, relayed: bool },
    SelectionChanged { start: Timestamp, end: Timestamp },
    DecodeFailed(PlaybackError),
}

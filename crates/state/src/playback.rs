/// Behavior when playback reaches the end of the working zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayingMode {
    /// Stop and remain on the last frame.
    Once,
    /// Rewind to the selection start and keep going.
    #[default]
    Loop,
    /// Reverse direction at each end of the selection.
    Bounce,
}

impl PlayingMode {
    pub fn cycled(self) -> Self {
        match self {
            PlayingMode::Once => PlayingMode::Loop,
            PlayingMode::Loop => PlayingMode::Bounce,
            PlayingMode::Bounce => PlayingMode::Once,
        }
    }
}

/// The only externally observable scheduler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackStatus {
    pub fn is_playing(self) -> bool {
        self == PlaybackStatus::Playing
    }
}

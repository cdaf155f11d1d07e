use thiserror::Error;

/// Decode failures the playback engine surfaces to its caller. Transient
/// outcomes (frame not read, allocation) are absorbed by the engine and
/// never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("decoded frame could not be converted to a displayable image")]
    ImageConversion,
    #[error("unclassified decode failure")]
    Decode,
}

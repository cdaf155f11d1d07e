use frameline_media::{PlaybackError, ReadOutcome};
use frameline_state::Timestamp;
use tracing::{debug, warn};

use crate::events::{EngineEvent, StopReason};

use super::PlaybackEngine;

impl PlaybackEngine {
    /// Asks the decode layer for the next frame and applies the outcome.
    ///
    /// `seek_target = None` advances by `frames_to_decode` frames. Failure
    /// handling deliberately never retries: a blocking or corrupt frame is
    /// assumed not to resolve itself within the session, so the engine
    /// clamps or stops instead.
    pub(crate) fn show_next_frame(&mut self, seek_target: Option<Timestamp>) -> ReadOutcome {
        let jumped = seek_target.is_some() || self.frames_to_decode.abs() > 1;
        let outcome = self.reader.read_frame(seek_target, self.frames_to_decode);

        match outcome {
            ReadOutcome::Success => {
                self.decoded_frames += 1;
                self.position = self.reader.current_timestamp();
                self.selection.set_position(self.position);
                if jumped {
                    // Frame-to-frame tracking cannot survive a jump.
                    self.overlay.stop_all_tracking();
                }
                self.overlay
                    .frame_rendered(self.position, self.synched && self.sync.merge_enabled);
                self.render.request_repaint();
                self.events.push(EngineEvent::PositionChanged(self.position));
            }
            ReadOutcome::NotLoaded => {}
            ReadOutcome::AllocationFailed => {
                // Low-level and usually paired with another, surfaced
                // error for the same frame.
                debug!("frame buffer allocation failed, stopping playback");
                self.stop_playing(StopReason::DecodeError);
            }
            ReadOutcome::FrameNotRead => {
                // Blocking frame or end of file: clamp to the selection end
                // and let the next tick's boundary logic decide.
                debug!(position = self.position, "frame not read, clamping to selection end");
                self.position = self.selection.sel_end();
                self.selection.set_position(self.position);
                self.overlay.stop_all_tracking();
                self.events.push(EngineEvent::PositionChanged(self.position));
            }
            ReadOutcome::ConversionFailed => {
                warn!("image conversion failed, stopping playback");
                self.stop_playing(StopReason::DecodeError);
                self.events
                    .push(EngineEvent::DecodeFailed(PlaybackError::ImageConversion));
            }
            ReadOutcome::Other => {
                warn!("unclassified decode failure, stopping playback");
                self.stop_playing(StopReason::DecodeError);
                self.events
                    .push(EngineEvent::DecodeFailed(PlaybackError::Decode));
            }
        }

        outcome
    }
}

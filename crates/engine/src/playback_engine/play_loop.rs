use frameline_state::playback::PlayingMode;
use tracing::{debug, warn};

use crate::constants::FRAME_QUEUE_THRESHOLD;
use crate::events::{EngineEvent, StopReason};

use super::PlaybackEngine;

impl PlaybackEngine {
    /// One scheduler tick.
    ///
    /// Normally driven by the timer worker through the intent queue; public
    /// so hosts and tests can run a manual clock. The decision procedure:
    /// detect end of range first, then either decode exactly one step (idle
    /// tick) or accumulate a frame skip (busy tick).
    pub fn tick(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if !self.status.is_playing() && !self.rewind_pending {
            return;
        }

        if self.status.is_playing() && !self.rewind_pending && self.check_boundary() {
            return;
        }

        let idle = self.render.is_idle();
        if idle || self.rewind_pending {
            if self.rewind_pending {
                self.rewind_pending = false;
                self.frames_to_decode = 1;
                if !self
                    .show_next_frame(Some(self.selection.sel_start()))
                    .is_success()
                {
                    warn!("rewind to selection start failed");
                    self.stop_playing(StopReason::DecodeError);
                    return;
                }
                if !self.status.is_playing() {
                    // Synchronized engines hold on frame zero until the
                    // coordinator restarts them.
                    return;
                }
            } else {
                self.show_next_frame(None);
            }
            self.frames_to_decode = if self.frames_to_decode < 0 { -1 } else { 1 };
        } else {
            self.absorb_backpressure();
        }
    }

    /// Returns true when the tick ends here: the next step would leave the
    /// working zone and the playing mode decided what happens instead.
    fn check_boundary(&mut self) -> bool {
        let ticks_per_frame = self.reader.info().average_ticks_per_frame;
        let target = self.position + self.frames_to_decode * ticks_per_frame;
        let forward = self.frames_to_decode >= 0;
        let past_boundary = if forward {
            target > self.selection.sel_end()
        } else {
            target < self.selection.sel_start()
        };
        if !past_boundary {
            return false;
        }

        debug!(position = self.position, target, "end of working zone reached");
        self.overlay.stop_all_tracking();

        match self.playing_mode {
            PlayingMode::Once => {
                // Stop and remain on the last decoded frame.
                self.stop_playing(StopReason::EndOfRange);
            }
            PlayingMode::Loop => {
                if self.synched {
                    // The coordinator decides when both engines restart.
                    self.stop_playing(StopReason::EndOfRange);
                }
                // Rewind on the next pumped tick, never from inside the
                // boundary branch.
                self.rewind_pending = true;
            }
            PlayingMode::Bounce => {
                // Declared symmetric to Loop with the decode direction
                // reversed; see the boundary tests for the assumption.
                self.frames_to_decode = if forward { -1 } else { 1 };
            }
        }
        true
    }

    /// Busy tick: the previous render has not been consumed. Prefer
    /// dropping frames to queueing unbounded work, and when the queue keeps
    /// growing anyway, trade requested speed for keeping up.
    fn absorb_backpressure(&mut self) {
        if self.overlay.has_active_tracking() {
            // Tracking consumes every frame; let it outpace the clock.
            return;
        }

        self.frames_to_decode += if self.frames_to_decode < 0 { -1 } else { 1 };
        self.dropped_frames += 1;

        if self.frames_to_decode.abs() > FRAME_QUEUE_THRESHOLD {
            self.frames_to_decode = 0;
            if self.speed.large_step_down() {
                debug!(
                    percentage = self.speed.slowmotion_percentage(),
                    dropped = self.dropped_frames,
                    "sustained frame drops, lowering playback speed"
                );
                self.restart_timer();
                self.events.push(EngineEvent::SpeedChanged {
                    slowmotion_percentage: self.speed.slowmotion_percentage(),
                    relayed: false,
                });
            }
        }
    }
}

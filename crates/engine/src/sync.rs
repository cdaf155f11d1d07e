use frameline_state::timebase::rescale;
use frameline_state::Timestamp;
use tracing::debug;

use crate::events::{EngineEvent, StopReason};
use crate::playback_engine::PlaybackEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Maps a relative offset from one working zone into another of a
/// different length, proportionally. Uses the same rescale primitive as
/// pixel mapping so cross-engine positions round the same way.
pub fn map_offset(offset: i64, from_span: i64, to_span: i64) -> i64 {
    rescale(offset, from_span, to_span)
}

/// Locks two playback engines to a shared logical clock.
///
/// Common positions are relative offsets into each engine's working zone,
/// never absolute timestamps, so two videos of different lengths and
/// framerates scrub together meaningfully. User actions in one engine are
/// relayed to the other exactly once per action: relayed operations emit
/// notifications marked `relayed`, which the coordinator ignores on the way
/// back.
pub struct SyncCoordinator {
    left: PlaybackEngine,
    right: PlaybackEngine,
    synching: bool,
    merging: bool,
}

impl SyncCoordinator {
    pub fn new(left: PlaybackEngine, right: PlaybackEngine) -> Self {
        Self {
            left,
            right,
            synching: false,
            merging: false,
        }
    }

    pub fn engine(&self, side: Side) -> &PlaybackEngine {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn engine_mut(&mut self, side: Side) -> &mut PlaybackEngine {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn left(&self) -> &PlaybackEngine {
        &self.left
    }

    pub fn left_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.left
    }

    pub fn right(&self) -> &PlaybackEngine {
        &self.right
    }

    pub fn right_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.right
    }

    pub fn is_synching(&self) -> bool {
        self.synching
    }

    pub fn is_merging(&self) -> bool {
        self.merging
    }

    pub fn set_synching(&mut self, on: bool) {
        self.synching = on;
        self.left.set_synched(on);
        self.right.set_synched(on);
        if !on {
            self.merging = false;
        }
    }

    pub fn set_merging(&mut self, on: bool) {
        if !self.synching {
            return;
        }
        self.merging = on;
        self.left.set_sync_merge(on);
        self.right.set_sync_merge(on);
    }

    /// Records both engines' current positions as their sync points. Time
    /// readouts then show distance from the marked event.
    pub fn set_sync_point(&mut self) {
        if !self.synching {
            return;
        }
        let left = self.left.relative_position();
        let right = self.right.relative_position();
        debug!(left, right, "sync point set");
        self.left.set_sync_position(left);
        self.right.set_sync_position(right);
    }

    /// Drains both engines and relays cross-engine effects. Returns the
    /// per-side notifications for the host UI.
    pub fn pump(&mut self) -> (Vec<EngineEvent>, Vec<EngineEvent>) {
        let left_events = self.left.pump();
        let right_events = self.right.pump();
        if self.synching {
            self.relay(Side::Left, &left_events);
            self.relay(Side::Right, &right_events);
            if self.merging {
                self.exchange_merge_frames();
            }
        }
        (left_events, right_events)
    }

    fn relay(&mut self, from: Side, events: &[EngineEvent]) {
        for event in events {
            match *event {
                EngineEvent::SpeedChanged { relayed: false, .. } => {
                    // Push the real-world equivalent, so engines with
                    // different capture factors still run at the same
                    // real-time rate.
                    let realtime = self.engine(from).speed().realtime_percentage();
                    debug!(?from, realtime, "relaying speed change");
                    self.engine_mut(from.other()).apply_relayed_speed(realtime);
                }
                EngineEvent::Sought {
                    position,
                    relayed: false,
                } => {
                    let target = self.map_position(from, position);
                    self.engine_mut(from.other()).apply_relayed_seek(target);
                }
                EngineEvent::Started { relayed: false } => {
                    self.engine_mut(from.other()).apply_relayed_play();
                }
                EngineEvent::Stopped {
                    reason: StopReason::Paused,
                    relayed: false,
                } => {
                    self.engine_mut(from.other()).apply_relayed_pause();
                }
                _ => {}
            }
        }
    }

    /// Maps an absolute position in `from`'s timeline to the equivalent
    /// absolute position in the other timeline.
    pub fn map_position(&self, from: Side, position: Timestamp) -> Timestamp {
        let src = self.engine(from).selection();
        let dst = self.engine(from.other()).selection();
        let offset = position - src.sel_start();
        dst.sel_start() + map_offset(offset, src.span(), dst.span())
    }

    /// Seeks both engines to the same relative offset, expressed as an
    /// absolute position in `from`'s timeline.
    pub fn common_seek(&mut self, from: Side, position: Timestamp) {
        let mapped = self.map_position(from, position);
        self.engine_mut(from).apply_relayed_seek(position);
        self.engine_mut(from.other()).apply_relayed_seek(mapped);
    }

    pub fn common_play(&mut self) {
        self.left.play();
        self.right.play();
    }

    pub fn common_pause(&mut self) {
        self.left.pause();
        self.right.pause();
    }

    fn exchange_merge_frames(&mut self) {
        // Pull, not push: each engine rendered its own frame once and hands
        // out already-transformed clones on demand.
        if let Some(frame) = self.left.rendered_frame() {
            self.right.set_sync_merge_image(frame);
        }
        if let Some(frame) = self.right.rendered_frame() {
            self.left.set_sync_merge_image(frame);
        }
    }
}

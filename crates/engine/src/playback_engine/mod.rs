mod play_loop;
mod read;

use std::sync::mpsc::{self, Receiver, Sender};

use frameline_media::{SeekCost, VideoReader};
use frameline_state::playback::{PlaybackStatus, PlayingMode};
use frameline_state::selection::SelectionRange;
use frameline_state::speed::SpeedControl;
use frameline_state::timecode::{format_timecode, TimecodeFormat};
use frameline_state::Timestamp;
use image::RgbaImage;
use tracing::debug;

use crate::events::{EngineEvent, EngineMsg, StopReason};
use crate::overlay::{NoOverlay, OverlayHost};
use crate::render::RenderTarget;
use crate::workers::tick_worker::{spawn_tick_worker, TickWorker};

/// Per-engine synchronization state. `sync_position` is relative to the
/// selection start, like every value exchanged between synchronized
/// engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncState {
    pub sync_position: Timestamp,
    pub merge_enabled: bool,
}

/// The playback scheduler.
///
/// Owns all playback state exclusively. The UI thread calls the public
/// operations directly; other threads (the timer worker included) enqueue
/// [`EngineMsg`] intents through [`command_sender`] and the host drains
/// them once per [`pump`], so no mutation is ever re-entrant.
///
/// [`command_sender`]: PlaybackEngine::command_sender
/// [`pump`]: PlaybackEngine::pump
pub struct PlaybackEngine {
    reader: Box<dyn VideoReader>,
    render: Box<dyn RenderTarget>,
    overlay: Box<dyn OverlayHost>,

    selection: SelectionRange,
    speed: SpeedControl,
    playing_mode: PlayingMode,
    status: PlaybackStatus,

    position: Timestamp,
    /// Signed frame delta for the next decode. Accumulates past 1 when the
    /// render surface cannot keep up, goes negative for backward stepping.
    frames_to_decode: i64,
    rewind_pending: bool,

    synched: bool,
    sync: SyncState,
    sync_merge_image: Option<RgbaImage>,

    decoded_frames: u64,
    dropped_frames: u64,

    timer: Option<TickWorker>,
    msg_tx: Sender<EngineMsg>,
    msg_rx: Receiver<EngineMsg>,
    events: Vec<EngineEvent>,
}

impl PlaybackEngine {
    pub fn new(reader: Box<dyn VideoReader>, render: Box<dyn RenderTarget>) -> Self {
        Self::with_overlay(reader, render, Box::new(NoOverlay))
    }

    pub fn with_overlay(
        reader: Box<dyn VideoReader>,
        render: Box<dyn RenderTarget>,
        overlay: Box<dyn OverlayHost>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        let selection = if reader.is_loaded() {
            let info = reader.info();
            SelectionRange::new(info.first_timestamp, info.last_timestamp())
        } else {
            SelectionRange::default()
        };
        let position = selection.minimum();

        let mut engine = Self {
            reader,
            render,
            overlay,
            selection,
            speed: SpeedControl::default(),
            playing_mode: PlayingMode::default(),
            status: PlaybackStatus::Stopped,
            position,
            frames_to_decode: 1,
            rewind_pending: false,
            synched: false,
            sync: SyncState::default(),
            sync_merge_image: None,
            decoded_frames: 0,
            dropped_frames: 0,
            timer: None,
            msg_tx,
            msg_rx,
            events: Vec::new(),
        };

        if engine.reader.is_loaded() {
            // Land on the first frame so the UI has something to show.
            engine.show_next_frame(Some(engine.selection.sel_start()));
        }
        engine
    }

    // --- Snapshot accessors -------------------------------------------

    pub fn position(&self) -> Timestamp {
        self.position
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    pub fn playing_mode(&self) -> PlayingMode {
        self.playing_mode
    }

    pub fn selection(&self) -> &SelectionRange {
        &self.selection
    }

    pub fn speed(&self) -> &SpeedControl {
        &self.speed
    }

    pub fn frames_to_decode(&self) -> i64 {
        self.frames_to_decode
    }

    pub fn decoded_frames(&self) -> u64 {
        self.decoded_frames
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// False when no source is loaded; hosts grey the transport controls
    /// out from this.
    pub fn is_enabled(&self) -> bool {
        self.reader.is_loaded()
    }

    /// How expensive seeks are for the loaded source. Hosts feed this into
    /// the frame tracker's report mode.
    pub fn seek_cost(&self) -> SeekCost {
        self.reader.seek_cost()
    }

    pub fn timer_interval_ms(&self) -> Option<f64> {
        self.timer.as_ref().map(|t| t.interval_ms())
    }

    // --- Intent queue -------------------------------------------------

    /// Cloneable handle for enqueueing intents from other threads.
    pub fn command_sender(&self) -> Sender<EngineMsg> {
        self.msg_tx.clone()
    }

    /// Drains queued intents and returns the notifications produced since
    /// the previous pump. Call this once per host frame.
    pub fn pump(&mut self) -> Vec<EngineEvent> {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.handle_msg(msg);
        }
        self.take_events()
    }

    /// Notifications produced by direct operation calls since the last
    /// drain, without touching the intent queue.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_msg(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::Tick => self.tick(),
            EngineMsg::Play => self.play(),
            EngineMsg::Pause => self.pause(),
            EngineMsg::TogglePlay => self.toggle_play(),
            EngineMsg::Seek(ts) => self.seek_to(ts),
            EngineMsg::StepForward => self.step_forward(),
            EngineMsg::StepBackward => self.step_backward(),
            EngineMsg::GotoStart => self.goto_start(),
            EngineMsg::GotoEnd => self.goto_end(),
            EngineMsg::SetSlowmotionPercentage(p) => self.set_slowmotion_percentage(p),
            EngineMsg::SetHighSpeedFactor(f) => self.set_high_speed_factor(f),
            EngineMsg::SetPlayingMode(mode) => self.set_playing_mode(mode),
            EngineMsg::SetSelection { start, end } => self.set_selection(start, end),
            EngineMsg::ResetSelection => self.reset_selection(),
        }
    }

    // --- Transport ----------------------------------------------------

    pub fn play(&mut self) {
        self.play_internal(false);
    }

    /// Play pushed by the sync coordinator; marked so it is not relayed
    /// back.
    pub fn apply_relayed_play(&mut self) {
        self.play_internal(true);
    }

    fn play_internal(&mut self, relayed: bool) {
        if !self.reader.is_loaded() || self.status.is_playing() {
            return;
        }
        self.status = PlaybackStatus::Playing;
        if self.frames_to_decode == 0 {
            self.frames_to_decode = 1;
        }
        self.start_timer();
        self.events.push(EngineEvent::Started { relayed });
    }

    pub fn pause(&mut self) {
        self.stop_playing(StopReason::Paused);
    }

    /// Pause pushed by the sync coordinator; marked so it is not relayed
    /// back.
    pub fn apply_relayed_pause(&mut self) {
        self.stop_internal(StopReason::Paused, true);
    }

    pub fn toggle_play(&mut self) {
        if self.status.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub(crate) fn stop_playing(&mut self, reason: StopReason) {
        self.stop_internal(reason, false);
    }

    fn stop_internal(&mut self, reason: StopReason, relayed: bool) {
        if !self.status.is_playing() {
            return;
        }
        self.stop_timer();
        self.status = PlaybackStatus::Stopped;
        self.frames_to_decode = 0;
        self.events.push(EngineEvent::Stopped { reason, relayed });
    }

    /// Pauses, decodes the clamped target once, and leaves the cursor
    /// there. Synchronous from the caller's point of view.
    pub fn seek_to(&mut self, target: Timestamp) {
        self.seek_internal(target, false);
    }

    /// Seek pushed by the sync coordinator; the resulting notification is
    /// marked so it is not relayed back.
    pub fn apply_relayed_seek(&mut self, target: Timestamp) {
        self.seek_internal(target, true);
    }

    fn seek_internal(&mut self, target: Timestamp, relayed: bool) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        self.rewind_pending = false;
        let target = self.selection.clamp(target);
        self.frames_to_decode = 1;
        if self.show_next_frame(Some(target)).is_success() {
            self.events.push(EngineEvent::Sought {
                position: self.position,
                relayed,
            });
        }
    }

    pub fn step_forward(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        self.frames_to_decode = 1;
        if self.position < self.selection.sel_end() {
            self.show_next_frame(None);
        } else if self.playing_mode == PlayingMode::Loop {
            self.show_next_frame(Some(self.selection.sel_start()));
        }
    }

    pub fn step_backward(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        if self.position <= self.selection.sel_start() {
            return;
        }
        let before = self.position;
        self.frames_to_decode = -1;
        self.show_next_frame(None);
        if self.position == before {
            // Some decoders land back on the same frame after a one-frame
            // rewind; ask for one more.
            self.frames_to_decode = -2;
            self.show_next_frame(None);
        }
        self.frames_to_decode = 1;
    }

    pub fn goto_start(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        self.frames_to_decode = 1;
        self.show_next_frame(Some(self.selection.sel_start()));
    }

    pub fn goto_end(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        self.frames_to_decode = 1;
        self.show_next_frame(Some(self.selection.sel_end()));
    }

    pub fn set_playing_mode(&mut self, mode: PlayingMode) {
        self.playing_mode = mode;
    }

    // --- Speed --------------------------------------------------------

    pub fn set_slowmotion_percentage(&mut self, percentage: f64) {
        self.speed.set_slowmotion_percentage(percentage);
        self.on_speed_changed(false);
    }

    /// Real-world percentage pushed by the sync coordinator; marked so the
    /// resulting notification is not relayed back.
    pub fn apply_relayed_speed(&mut self, realtime_percentage: f64) {
        self.speed.set_realtime_percentage(realtime_percentage);
        self.on_speed_changed(true);
    }

    pub fn set_high_speed_factor(&mut self, factor: f64) {
        self.speed.set_high_speed_factor(factor);
        self.on_speed_changed(false);
    }

    fn on_speed_changed(&mut self, relayed: bool) {
        // A new interval means a new timer, never a mutated one.
        self.restart_timer();
        self.events.push(EngineEvent::SpeedChanged {
            slowmotion_percentage: self.speed.slowmotion_percentage(),
            relayed,
        });
    }

    // --- Selection ----------------------------------------------------

    pub fn set_selection(&mut self, start: Timestamp, end: Timestamp) {
        self.selection.set_selection(start, end);
        self.after_selection_changed();
    }

    pub fn reset_selection(&mut self) {
        self.selection.reset();
        self.after_selection_changed();
    }

    /// Bounds recomputation pushed by the decode layer when it discovers
    /// more accurate limits than the container advertised.
    pub fn set_bounds(&mut self, minimum: Timestamp, maximum: Timestamp) {
        self.selection.set_bounds(minimum, maximum);
        self.after_selection_changed();
    }

    fn after_selection_changed(&mut self) {
        if self.status.is_playing() {
            self.pause();
        }
        self.rewind_pending = false;
        if !self.selection.contains(self.position) {
            let target = self.selection.clamp(self.position);
            self.frames_to_decode = 1;
            self.show_next_frame(Some(target));
        }
        self.events.push(EngineEvent::SelectionChanged {
            start: self.selection.sel_start(),
            end: self.selection.sel_end(),
        });
    }

    /// Reconciles the committed selection against exact frame timestamps
    /// from the reader and lands on its first frame. This pays a decode,
    /// which is why it runs on committed changes only, never per drag
    /// pixel.
    pub fn import_selection(&mut self) {
        if !self.reader.is_loaded() {
            return;
        }
        if self.status.is_playing() {
            self.pause();
        }
        let info = *self.reader.info();
        if info.average_ticks_per_frame > 0 {
            let first =
                (self.selection.sel_start() - info.first_timestamp) / info.average_ticks_per_frame;
            let last =
                (self.selection.sel_end() - info.first_timestamp) / info.average_ticks_per_frame;
            let exact_start = self.reader.timestamp_of_frame(first);
            let exact_end = self.reader.timestamp_of_frame(last);
            if exact_start != self.selection.sel_start() || exact_end != self.selection.sel_end() {
                debug!(exact_start, exact_end, "selection adjusted to exact frame timestamps");
                self.selection.set_selection(exact_start, exact_end);
                self.events.push(EngineEvent::SelectionChanged {
                    start: exact_start,
                    end: exact_end,
                });
            }
        }
        self.frames_to_decode = 1;
        self.show_next_frame(Some(self.selection.sel_start()));
    }

    // --- Synchronization ----------------------------------------------

    pub fn set_synched(&mut self, synched: bool) {
        self.synched = synched;
        if !synched {
            self.sync = SyncState::default();
            self.sync_merge_image = None;
        }
    }

    pub fn is_synched(&self) -> bool {
        self.synched
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    pub fn set_sync_position(&mut self, relative: Timestamp) {
        self.sync.sync_position = relative;
    }

    pub fn set_sync_merge(&mut self, enabled: bool) {
        self.sync.merge_enabled = enabled;
        if !enabled {
            self.sync_merge_image = None;
        }
    }

    /// Ghost frame received from the other engine, for semi-transparent
    /// compositing by the host.
    pub fn set_sync_merge_image(&mut self, image: RgbaImage) {
        self.sync_merge_image = Some(image);
    }

    pub fn sync_merge_image(&self) -> Option<&RgbaImage> {
        self.sync_merge_image.as_ref()
    }

    /// Cloned copy of this engine's current frame for the other engine's
    /// ghost overlay. Pull model: the frame was rendered once, consumers
    /// clone on demand.
    pub fn rendered_frame(&self) -> Option<RgbaImage> {
        self.reader.current_image().cloned()
    }

    /// Position as distance from the selection start, the unit shared
    /// between synchronized engines.
    pub fn relative_position(&self) -> i64 {
        self.position - self.selection.sel_start()
    }

    // --- Readouts -----------------------------------------------------

    /// Current position formatted for the position label, relative to the
    /// selection start and, when synchronized, to the sync point.
    pub fn current_timecode(&self, format: TimecodeFormat) -> String {
        let mut ts = self.position - self.selection.sel_start();
        if self.synched {
            ts -= self.sync.sync_position;
        }
        format_timecode(
            ts,
            format,
            &self.reader.info().timing(),
            self.speed.high_speed_factor(),
        )
    }

    pub fn selection_duration_timecode(&self, format: TimecodeFormat) -> String {
        format_timecode(
            self.selection.span(),
            format,
            &self.reader.info().timing(),
            self.speed.high_speed_factor(),
        )
    }

    // --- Timer --------------------------------------------------------

    fn start_timer(&mut self) {
        let interval = self
            .speed
            .playback_interval_ms(self.reader.info().frame_interval_ms);
        self.timer = Some(spawn_tick_worker(interval, self.msg_tx.clone()));
        debug!(interval_ms = interval, "playback timer started");
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
            debug!("playback timer stopped");
        }
    }

    pub(crate) fn restart_timer(&mut self) {
        if self.status.is_playing() {
            self.stop_timer();
            self.start_timer();
        }
    }
}

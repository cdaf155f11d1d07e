//! Scheduler behavior against a scripted reader and a manual clock.

use std::cell::Cell;
use std::rc::Rc;

use frameline_engine::{
    EngineEvent, EngineMsg, GatedRenderTarget, OverlayHost, PlaybackEngine, StopReason,
};
use frameline_media::testing::ScriptedReader;
use frameline_media::{PlaybackError, ReadOutcome};
use frameline_state::playback::PlayingMode;
use frameline_state::timecode::TimecodeFormat;
use frameline_state::Timestamp;

/// 25 fps source, 40 ticks per frame, timestamps 0..=1000.
fn standard_reader() -> ScriptedReader {
    ScriptedReader::new(40, 25.0, 26)
}

fn engine_with(reader: ScriptedReader) -> (PlaybackEngine, GatedRenderTarget) {
    let gate = GatedRenderTarget::new();
    let mut engine = PlaybackEngine::new(Box::new(reader), Box::new(gate.clone()));
    // Consume the bootstrap frame so the first tick is an idle tick.
    gate.set_idle(true);
    engine.take_events();
    (engine, gate)
}

fn standard_engine() -> (PlaybackEngine, GatedRenderTarget) {
    engine_with(standard_reader())
}

/// Runs one idle tick: the previous frame has been consumed.
fn idle_tick(engine: &mut PlaybackEngine, gate: &GatedRenderTarget) {
    gate.set_idle(true);
    engine.tick();
}

#[test]
fn basic_playback_advances_one_frame_per_idle_tick() {
    let (mut engine, gate) = standard_engine();
    assert_eq!(engine.position(), 0);

    engine.play();
    assert!(engine.is_playing());

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 40);

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 80);
}

#[test]
fn pause_stops_advancement_on_subsequent_ticks() {
    let (mut engine, gate) = standard_engine();
    engine.play();
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 40);

    engine.pause();
    assert!(!engine.is_playing());
    for _ in 0..5 {
        idle_tick(&mut engine, &gate);
    }
    assert_eq!(engine.position(), 40);
}

#[test]
fn loop_mode_rewinds_on_the_tick_after_the_boundary() {
    let (mut engine, gate) = standard_engine();
    engine.set_playing_mode(PlayingMode::Loop);
    engine.seek_to(960);
    engine.play();

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 1000);

    // 1000 + 40 would leave the selection: the boundary tick flags the
    // rewind but does not decode.
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 1000);
    assert!(engine.is_playing());

    // The next tick rewinds to the selection start instead of advancing.
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 0);
    assert!(engine.is_playing());
}

#[test]
fn once_mode_stops_on_the_last_frame() {
    let (mut engine, gate) = standard_engine();
    engine.set_playing_mode(PlayingMode::Once);
    engine.seek_to(960);
    engine.play();
    engine.take_events();

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 1000);

    idle_tick(&mut engine, &gate);
    assert!(!engine.is_playing());
    assert_eq!(engine.position(), 1000);
    assert!(engine.take_events().contains(&EngineEvent::Stopped {
        reason: StopReason::EndOfRange,
        relayed: false
    }));

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 1000);
}

#[test]
fn synchronized_loop_holds_on_frame_zero_until_restarted() {
    let (mut engine, gate) = standard_engine();
    engine.set_synched(true);
    engine.set_playing_mode(PlayingMode::Loop);
    engine.seek_to(960);
    engine.play();

    idle_tick(&mut engine, &gate); // 1000
    idle_tick(&mut engine, &gate); // boundary: pause + flag rewind
    assert!(!engine.is_playing());

    idle_tick(&mut engine, &gate); // rewind executes while paused
    assert_eq!(engine.position(), 0);
    assert!(!engine.is_playing());
}

#[test]
fn bounce_mode_reverses_direction_at_each_end() {
    // Bounce is specified as Loop with the decode direction reversed; this
    // test records that assumption.
    let (mut engine, gate) = standard_engine();
    engine.set_playing_mode(PlayingMode::Bounce);
    engine.seek_to(960);
    engine.play();

    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 1000);

    idle_tick(&mut engine, &gate); // boundary: flip to backward
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 960);
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 920);

    // Run long enough to hit the front boundary and bounce forward again.
    for _ in 0..30 {
        idle_tick(&mut engine, &gate);
    }
    assert!(engine.is_playing());
    let pos = engine.position();
    assert!((0..=1000).contains(&pos), "position {pos} left the selection");
}

#[test]
fn backpressure_accumulates_skips_and_lowers_speed_exactly_once() {
    let (mut engine, gate) = standard_engine();
    engine.play();
    engine.take_events();
    assert_eq!(engine.speed().slowmotion_percentage(), 100.0);

    gate.set_idle(false);
    for _ in 0..6 {
        engine.tick();
        // The queue stabilizes right under the threshold.
        assert!(engine.frames_to_decode() <= 6);
    }

    let reductions = engine
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, EngineEvent::SpeedChanged { .. }))
        .count();
    assert_eq!(reductions, 1);
    assert_eq!(engine.speed().slowmotion_percentage(), 95.0);
    assert_eq!(engine.frames_to_decode(), 0);
    assert_eq!(engine.dropped_frames(), 6);
    // Nothing was decoded while the render surface was busy.
    assert_eq!(engine.position(), 0);
}

#[test]
fn next_successful_tick_skips_ahead_by_the_accumulated_frames() {
    let (mut engine, gate) = standard_engine();
    engine.play();

    gate.set_idle(false);
    engine.tick();
    engine.tick();
    assert_eq!(engine.frames_to_decode(), 3);

    idle_tick(&mut engine, &gate);
    // One decode covering three frames, then the queue resets.
    assert_eq!(engine.position(), 120);
    assert_eq!(engine.frames_to_decode(), 1);
}

struct TrackingOverlay {
    tracking: Rc<Cell<bool>>,
    stops: Rc<Cell<u32>>,
}

impl OverlayHost for TrackingOverlay {
    fn frame_rendered(&mut self, _position: Timestamp, _merge_active: bool) {}

    fn has_active_tracking(&self) -> bool {
        self.tracking.get()
    }

    fn stop_all_tracking(&mut self) {
        self.stops.set(self.stops.get() + 1);
        self.tracking.set(false);
    }
}

#[test]
fn active_tracking_suspends_frame_skipping() {
    let tracking = Rc::new(Cell::new(false));
    let stops = Rc::new(Cell::new(0));
    let gate = GatedRenderTarget::new();
    let mut engine = PlaybackEngine::with_overlay(
        Box::new(standard_reader()),
        Box::new(gate.clone()),
        Box::new(TrackingOverlay {
            tracking: Rc::clone(&tracking),
            stops: Rc::clone(&stops),
        }),
    );
    engine.play();
    // A tracking edit starts following frames.
    tracking.set(true);

    gate.set_idle(false);
    for _ in 0..10 {
        engine.tick();
    }
    // Tracking needs every frame: nothing is skipped while it runs.
    assert_eq!(engine.frames_to_decode(), 1);
    assert_eq!(engine.dropped_frames(), 0);
}

#[test]
fn multi_frame_jumps_force_stop_tracking() {
    let tracking = Rc::new(Cell::new(false));
    let stops = Rc::new(Cell::new(0));
    let gate = GatedRenderTarget::new();
    let mut engine = PlaybackEngine::with_overlay(
        Box::new(standard_reader()),
        Box::new(gate.clone()),
        Box::new(TrackingOverlay {
            tracking: Rc::clone(&tracking),
            stops: Rc::clone(&stops),
        }),
    );
    let before = stops.get();
    engine.seek_to(520);
    assert!(stops.get() > before, "a seek must cancel tracking");
}

#[test]
fn seek_pauses_first_and_lands_on_the_clamped_target() {
    let (mut engine, _gate) = standard_engine();
    engine.play();
    engine.take_events();

    engine.seek_to(520);
    assert!(!engine.is_playing());
    assert_eq!(engine.position(), 520);
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::Sought {
        position: 520,
        relayed: false
    }));

    // Out-of-selection targets clamp at the API boundary.
    engine.seek_to(5_000);
    assert_eq!(engine.position(), 1000);
}

#[test]
fn frame_not_read_clamps_to_selection_end_and_loops_normally() {
    let mut reader = standard_reader();
    reader.script_outcome(ReadOutcome::Success); // bootstrap frame
    reader.script_outcome(ReadOutcome::FrameNotRead);
    let (mut engine, gate) = engine_with(reader);
    engine.set_playing_mode(PlayingMode::Loop);
    engine.play();

    idle_tick(&mut engine, &gate);
    // Clamped to the selection end, still playing, no surfaced error.
    assert_eq!(engine.position(), 1000);
    assert!(engine.is_playing());
    assert!(!engine
        .take_events()
        .iter()
        .any(|e| matches!(e, EngineEvent::DecodeFailed(_))));

    // The next tick's boundary logic decides: loop back to the start.
    idle_tick(&mut engine, &gate);
    idle_tick(&mut engine, &gate);
    assert_eq!(engine.position(), 0);
}

#[test]
fn conversion_failure_stops_playback_and_surfaces_the_error() {
    let mut reader = standard_reader();
    reader.script_outcome(ReadOutcome::Success); // bootstrap frame
    reader.script_outcome(ReadOutcome::ConversionFailed);
    let (mut engine, gate) = engine_with(reader);
    engine.play();
    engine.take_events();

    idle_tick(&mut engine, &gate);
    assert!(!engine.is_playing());
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::DecodeFailed(PlaybackError::ImageConversion)));
    assert!(events.contains(&EngineEvent::Stopped {
        reason: StopReason::DecodeError,
        relayed: false
    }));
}

#[test]
fn allocation_failure_stops_playback_silently() {
    let mut reader = standard_reader();
    reader.script_outcome(ReadOutcome::Success); // bootstrap frame
    reader.script_outcome(ReadOutcome::AllocationFailed);
    let (mut engine, gate) = engine_with(reader);
    engine.play();
    engine.take_events();

    idle_tick(&mut engine, &gate);
    assert!(!engine.is_playing());
    let events = engine.take_events();
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::DecodeFailed(_))));
    assert!(events.contains(&EngineEvent::Stopped {
        reason: StopReason::DecodeError,
        relayed: false
    }));
}

#[test]
fn an_unloaded_reader_disables_every_operation() {
    let gate = GatedRenderTarget::new();
    let mut engine = PlaybackEngine::new(Box::new(ScriptedReader::unloaded()), Box::new(gate));
    assert!(!engine.is_enabled());

    engine.play();
    assert!(!engine.is_playing());
    engine.tick();
    engine.seek_to(100);
    assert_eq!(engine.position(), 0);
    assert!(engine.take_events().is_empty());
}

#[test]
fn speed_changes_take_effect_by_restarting_the_timer() {
    let (mut engine, _gate) = standard_engine();
    engine.play();
    assert_eq!(engine.timer_interval_ms(), Some(40.0));

    engine.set_slowmotion_percentage(50.0);
    assert_eq!(engine.timer_interval_ms(), Some(80.0));

    engine.set_slowmotion_percentage(200.0);
    assert_eq!(engine.timer_interval_ms(), Some(20.0));

    engine.pause();
    assert_eq!(engine.timer_interval_ms(), None);
}

#[test]
fn step_forward_and_backward_jog_one_frame() {
    let (mut engine, _gate) = standard_engine();
    engine.step_forward();
    assert_eq!(engine.position(), 40);
    engine.step_forward();
    assert_eq!(engine.position(), 80);
    engine.step_backward();
    assert_eq!(engine.position(), 40);
    engine.step_backward();
    engine.step_backward(); // already at the selection start
    assert_eq!(engine.position(), 0);
}

#[test]
fn step_forward_at_the_end_wraps_in_loop_mode() {
    let (mut engine, _gate) = standard_engine();
    engine.set_playing_mode(PlayingMode::Loop);
    engine.goto_end();
    assert_eq!(engine.position(), 1000);
    engine.step_forward();
    assert_eq!(engine.position(), 0);

    engine.set_playing_mode(PlayingMode::Once);
    engine.goto_end();
    engine.step_forward();
    assert_eq!(engine.position(), 1000);
}

#[test]
fn selection_changes_commit_once_and_reclamp_the_position() {
    let (mut engine, _gate) = standard_engine();
    engine.seek_to(520);
    engine.take_events();

    engine.set_selection(100, 400);
    assert_eq!(engine.position(), 400);
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::SelectionChanged {
        start: 100,
        end: 400
    }));
}

#[test]
fn import_selection_reconciles_to_exact_frame_timestamps() {
    let (mut engine, _gate) = standard_engine();
    // 100 is not on the 40-tick frame grid; the reader's exact frame
    // timestamp for that pixel-mapped value is 80.
    engine.set_selection(100, 400);
    engine.take_events();

    engine.import_selection();
    assert_eq!(engine.selection().sel_start(), 80);
    assert_eq!(engine.selection().sel_end(), 400);
    assert_eq!(engine.position(), 80);
    assert!(engine
        .take_events()
        .contains(&EngineEvent::SelectionChanged { start: 80, end: 400 }));
}

#[test]
fn intents_enqueued_from_outside_are_drained_by_pump() {
    let (mut engine, _gate) = standard_engine();
    let commands = engine.command_sender();

    commands.send(EngineMsg::Seek(200)).unwrap();
    commands.send(EngineMsg::SetSlowmotionPercentage(50.0)).unwrap();
    let events = engine.pump();

    assert_eq!(engine.position(), 200);
    assert_eq!(engine.speed().slowmotion_percentage(), 50.0);
    assert!(events.contains(&EngineEvent::Sought {
        position: 200,
        relayed: false
    }));
}

#[test]
fn timecode_readout_is_relative_to_the_selection_start() {
    let (mut engine, _gate) = standard_engine();
    engine.set_selection(200, 1000);
    engine.seek_to(400);
    assert_eq!(
        engine.current_timecode(TimecodeFormat::Timestamps),
        "200"
    );
    assert_eq!(
        engine.current_timecode(TimecodeFormat::Milliseconds),
        "200"
    );
}

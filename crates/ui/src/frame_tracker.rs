use egui::{pos2, vec2, Rect, Sense, Stroke};
use frameline_state::markers::{Marker, MarkerShape};
use frameline_state::timebase::PixelMapper;
use frameline_state::Timestamp;

use crate::constants::{CURSOR_WIDTH, SPACER_WIDTH, TRACKER_HEIGHT};
use crate::theme;

/// Notifications from the frame tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionEvent {
    /// Mouse still down. Only emitted in report-on-mouse-move mode.
    Changing(Timestamp),
    /// Mouse released, jump to the position.
    Changed(Timestamp),
}

/// The navigation cursor with a gutter of annotation markers.
///
/// Marker pixel positions are cached and recomputed only when the visible
/// range or the control size changes, never per position update, so moving
/// the cursor stays O(1) in the number of markers.
///
/// `report_on_mouse_move` is set by the host from the decode layer's seek
/// cost: per-move reporting is only affordable when seeks are cheap. The
/// control itself is mode-agnostic.
pub struct FrameTracker {
    minimum: Timestamp,
    maximum: Timestamp,
    position: Timestamp,

    min_pixel: i32,
    max_pixel: i32,
    /// Left edge of the cursor, in pixels.
    pixel_position: i32,

    enabled: bool,
    report_on_mouse_move: bool,
    dragging: bool,

    markers: Vec<Marker>,
    point_marks: Vec<i32>,
    /// `(left, width)` in control coordinates.
    span_marks: Vec<(i32, i32)>,
    sync_position: Option<Timestamp>,
    sync_mark: Option<i32>,
}

impl FrameTracker {
    pub fn new(width: i32) -> Self {
        let min_pixel = SPACER_WIDTH + CURSOR_WIDTH / 2;
        let max_pixel = (width - SPACER_WIDTH - CURSOR_WIDTH / 2).max(min_pixel + 1);
        Self {
            minimum: 0,
            maximum: 100,
            position: 0,
            min_pixel,
            max_pixel,
            pixel_position: min_pixel - CURSOR_WIDTH / 2,
            enabled: true,
            report_on_mouse_move: false,
            dragging: false,
            markers: Vec::new(),
            point_marks: Vec::new(),
            span_marks: Vec::new(),
            sync_position: None,
            sync_mark: None,
        }
    }

    pub fn position(&self) -> Timestamp {
        self.position
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn report_on_mouse_move(&self) -> bool {
        self.report_on_mouse_move
    }

    /// True while the user is scrubbing. Hosts use this to stop pushing
    /// engine positions into the control mid-drag.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_report_on_mouse_move(&mut self, report: bool) {
        self.report_on_mouse_move = report;
    }

    fn mapper(&self) -> PixelMapper {
        PixelMapper::new(self.min_pixel, self.max_pixel, self.minimum, self.maximum)
    }

    /// New visible range, typically after the working zone changed. Marker
    /// positions are recomputed here and nowhere else on the hot path.
    pub fn remap(&mut self, minimum: Timestamp, maximum: Timestamp) {
        self.minimum = minimum;
        self.maximum = maximum.max(minimum);
        self.position = self.position.clamp(self.minimum, self.maximum);
        self.update_marker_positions();
        self.update_cursor_position();
    }

    /// Moves the cursor. No events back, no marker recompute.
    pub fn set_position(&mut self, position: Timestamp) {
        self.position = position.clamp(self.minimum, self.maximum);
        self.update_cursor_position();
    }

    /// Control resize only: data does not change.
    pub fn resize(&mut self, width: i32) {
        let max_pixel = (width - SPACER_WIDTH - CURSOR_WIDTH / 2).max(self.min_pixel + 1);
        if max_pixel == self.max_pixel {
            return;
        }
        self.max_pixel = max_pixel;
        self.update_marker_positions();
        self.update_cursor_position();
    }

    pub fn enable_disable(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    /// Snapshot of the annotation collaborator's markers. Read-only here.
    pub fn update_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
        self.update_marker_positions();
    }

    pub fn set_sync_marker(&mut self, position: Option<Timestamp>) {
        self.sync_position = position;
        self.update_marker_positions();
    }

    /// Mouse down or drag at pixel `x`.
    pub fn mouse_move(&mut self, x: i32) -> Option<PositionEvent> {
        if !self.enabled || x <= self.min_pixel || x >= self.max_pixel {
            return None;
        }
        self.dragging = true;
        self.pixel_position = x - CURSOR_WIDTH / 2;
        if self.report_on_mouse_move {
            self.position = self.mapper().timestamp_from_coord(x);
            Some(PositionEvent::Changing(self.position))
        } else {
            None
        }
    }

    /// Mouse released: jump to the position under the cursor.
    pub fn mouse_up(&mut self, x: i32) -> Option<PositionEvent> {
        self.dragging = false;
        if !self.enabled || x <= self.min_pixel || x >= self.max_pixel {
            return None;
        }
        self.pixel_position = x - CURSOR_WIDTH / 2;
        self.position = self.mapper().timestamp_from_coord(x);
        Some(PositionEvent::Changed(self.position))
    }

    fn update_cursor_position(&mut self) {
        self.pixel_position = self.mapper().coord_from_timestamp(self.position) - CURSOR_WIDTH / 2;
    }

    fn update_marker_positions(&mut self) {
        let mapper = self.mapper();
        self.point_marks.clear();
        self.span_marks.clear();

        for marker in &self.markers {
            match marker.shape {
                MarkerShape::Point { at } => {
                    if at >= self.minimum && at <= self.maximum {
                        self.point_marks.push(mapper.coord_from_timestamp(at));
                    }
                }
                MarkerShape::Span { start, end } => {
                    // Keep anything with at least some overlap, clipped to
                    // the visible range.
                    if start <= self.maximum && end >= self.minimum {
                        let left = mapper.coord_from_timestamp(start.max(self.minimum));
                        let right = mapper.coord_from_timestamp(end.min(self.maximum));
                        self.span_marks.push((left, right - left));
                    }
                }
            }
        }

        self.sync_mark = self.sync_position.and_then(|ts| {
            if ts >= self.minimum && ts <= self.maximum {
                Some(mapper.coord_from_timestamp(ts))
            } else {
                None
            }
        });
    }
}

/// Immediate-mode panel wrapping the tracker. Returns the notifications
/// produced by this frame's interaction.
pub fn frame_tracker_panel(ui: &mut egui::Ui, tracker: &mut FrameTracker) -> Vec<PositionEvent> {
    let mut events = Vec::new();

    let desired = vec2(ui.available_width(), TRACKER_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
    tracker.resize(rect.width() as i32);

    let local_x = |pos: egui::Pos2| (pos.x - rect.min.x) as i32;

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(event) = tracker.mouse_move(local_x(pos)) {
                events.push(event);
            }
        }
    }
    if response.drag_stopped() || response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(event) = tracker.mouse_up(local_x(pos)) {
                events.push(event);
            }
        }
    }

    paint(ui, rect, tracker);
    events
}

fn paint(ui: &egui::Ui, rect: Rect, tracker: &FrameTracker) {
    let painter = ui.painter().with_clip_rect(rect);
    let left = rect.min.x;
    let top = rect.min.y;
    let height = rect.height();

    painter.rect_filled(rect, theme::ROUNDING_SM, theme::GUTTER_BG);

    if !tracker.is_enabled() {
        return;
    }

    for &(mark_left, mark_width) in &tracker.span_marks {
        let mark = Rect::from_min_size(
            pos2(left + mark_left as f32, top + 5.0),
            vec2(mark_width.max(2) as f32, 8.0),
        );
        painter.rect_filled(mark, theme::ROUNDING_SM, theme::MARKER_SPAN.gamma_multiply(0.5));
        painter.rect_stroke(
            mark,
            theme::ROUNDING_SM,
            Stroke::new(1.0, theme::MARKER_SPAN),
            egui::StrokeKind::Inside,
        );
    }

    for &mark_x in &tracker.point_marks {
        let mark = Rect::from_min_size(pos2(left + mark_x as f32 - 1.0, top + 5.0), vec2(3.0, 8.0));
        painter.rect_filled(mark, theme::ROUNDING_SM, theme::MARKER_POINT);
    }

    if let Some(sync_x) = tracker.sync_mark {
        let mark = Rect::from_min_size(pos2(left + sync_x as f32 - 1.0, top + 5.0), vec2(3.0, 8.0));
        painter.rect_filled(mark, theme::ROUNDING_SM, theme::MARKER_SYNC);
    }

    // The cursor.
    let cursor = Rect::from_min_size(
        pos2(left + tracker.pixel_position as f32, top + 1.0),
        vec2(CURSOR_WIDTH as f32, height - 2.0),
    );
    painter.rect_filled(cursor, theme::ROUNDING_SM, theme::CURSOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> FrameTracker {
        let mut t = FrameTracker::new(1000 + 2 * SPACER_WIDTH + CURSOR_WIDTH);
        t.remap(0, 1000);
        t
    }

    #[test]
    fn remap_clamps_the_position_into_the_new_range() {
        let mut t = tracker();
        t.set_position(900);
        t.remap(0, 500);
        assert_eq!(t.position(), 500);
    }

    #[test]
    fn markers_are_cached_in_pixels_and_clipped_to_the_range() {
        let mut t = tracker();
        t.update_markers(&[
            Marker::point(500),
            Marker::point(2_000),
            Marker::span(-100, 250),
            Marker::span(1_500, 1_600),
        ]);
        assert_eq!(t.point_marks.len(), 1);
        assert_eq!(t.span_marks.len(), 1);
        // The span is clipped to start at the range minimum.
        let (span_left, _) = t.span_marks[0];
        assert_eq!(span_left, t.min_pixel);
    }

    #[test]
    fn marker_pixels_follow_a_remap() {
        let mut t = tracker();
        t.update_markers(&[Marker::point(500)]);
        let before = t.point_marks[0];
        t.remap(0, 2_000);
        let after = t.point_marks[0];
        assert!(after < before, "marker should move left when the range doubles");
    }

    #[test]
    fn silent_mode_reports_only_on_mouse_up() {
        let mut t = tracker();
        assert!(t.mouse_move(t.min_pixel + 500).is_none());
        match t.mouse_up(t.min_pixel + 500) {
            Some(PositionEvent::Changed(pos)) => assert!((pos - 500).abs() <= 1),
            other => panic!("expected Changed, got {other:?}"),
        }
    }

    #[test]
    fn cheap_seek_mode_reports_every_move() {
        let mut t = tracker();
        t.set_report_on_mouse_move(true);
        match t.mouse_move(t.min_pixel + 250) {
            Some(PositionEvent::Changing(pos)) => assert!((pos - 250).abs() <= 1),
            other => panic!("expected Changing, got {other:?}"),
        }
    }

    #[test]
    fn moves_outside_the_usable_band_are_ignored() {
        let mut t = tracker();
        assert!(t.mouse_move(0).is_none());
        assert!(t.mouse_up(10_000).is_none());
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn sync_marker_only_shows_inside_the_range() {
        let mut t = tracker();
        t.set_sync_marker(Some(400));
        assert!(t.sync_mark.is_some());
        t.set_sync_marker(Some(5_000));
        assert!(t.sync_mark.is_none());
    }
}

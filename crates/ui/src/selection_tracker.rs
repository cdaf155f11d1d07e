use egui::{pos2, vec2, Rect, Sense, Stroke};
use frameline_state::selection::SelectionRange;
use frameline_state::timebase::PixelMapper;
use frameline_state::Timestamp;
use tracing::debug;

use crate::constants::{BUMPER_WIDTH, HANDLER_WIDTH, SPACER_WIDTH, TRACKER_HEIGHT};
use crate::theme;

/// Notifications from the working-zone control.
///
/// `Changing` fires on every drag pixel and is for cheap consumers (live
/// labels). `Changed` and `PositionAcquired` fire once on release and are
/// the commit points where downstream may run expensive work such as
/// re-importing a frame cache. That split is what keeps the expensive path
/// off the mouse-move rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Changing {
        start: Timestamp,
        end: Timestamp,
        position: Timestamp,
    },
    Changed {
        start: Timestamp,
        end: Timestamp,
    },
    PositionAcquired(Timestamp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    LeftHandle,
    RightHandle,
    Target,
}

/// The working-zone control: bumpers at the ends, a handle on each side of
/// the selection, a middle bar, and a hairline for the current position.
///
/// Data lives in absolute timestamps; the drag state machine works in
/// pixels and reads timestamps back through the shared mapper. Programmatic
/// setters update appearance only and never raise events back.
pub struct SelectionTracker {
    range: SelectionRange,
    enabled: bool,
    locked: bool,

    min_pixel: i32,
    max_pixel: i32,
    max_width_pixel: i32,
    start_pixel: i32,
    end_pixel: i32,
    position_pixel: i32,

    drag: Option<DragKind>,
}

impl SelectionTracker {
    pub fn new(width: i32) -> Self {
        let min_pixel = SPACER_WIDTH + BUMPER_WIDTH;
        let max_pixel = (width - SPACER_WIDTH - BUMPER_WIDTH).max(min_pixel + 1);
        let mut tracker = Self {
            range: SelectionRange::default(),
            enabled: true,
            locked: false,
            min_pixel,
            max_pixel,
            max_width_pixel: max_pixel - min_pixel,
            start_pixel: min_pixel,
            end_pixel: max_pixel,
            position_pixel: min_pixel,
            drag: None,
        };
        tracker.update_appearance();
        tracker
    }

    pub fn range(&self) -> &SelectionRange {
        &self.range
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True while a handle or the hairline is being dragged. Hosts use this
    /// to stop pushing engine positions into the control mid-drag.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn mapper(&self) -> PixelMapper {
        PixelMapper::new(
            self.min_pixel,
            self.max_pixel,
            self.range.minimum(),
            self.range.maximum(),
        )
    }

    /// Updates every timestamp at once without raising events back. For
    /// when the engine's state changed by other means than this control.
    pub fn update_internal_state(
        &mut self,
        minimum: Timestamp,
        maximum: Timestamp,
        start: Timestamp,
        end: Timestamp,
        position: Timestamp,
    ) {
        self.range = SelectionRange::new(minimum, maximum);
        self.range.set_selection(start, end);
        self.range.set_position(position);
        self.update_appearance();
    }

    /// Moves the hairline. No events.
    pub fn set_position(&mut self, position: Timestamp) {
        self.range.set_position(position);
        self.update_appearance();
    }

    /// Selection back to the full bounds, position at the start. No events.
    pub fn reset(&mut self) {
        self.range.reset();
        self.update_appearance();
    }

    /// Control resize only: data does not change.
    pub fn resize(&mut self, width: i32) {
        let max_pixel = (width - SPACER_WIDTH - BUMPER_WIDTH).max(self.min_pixel + 1);
        if max_pixel == self.max_pixel {
            return;
        }
        self.max_pixel = max_pixel;
        self.max_width_pixel = self.max_pixel - self.min_pixel;
        self.update_appearance();
    }

    pub fn enable_disable(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    /// Starts a drag at pixel `x`. Returns whether anything was grabbed.
    /// Handles refuse the grab while the selection is locked; the hairline
    /// stays grabbable.
    pub fn begin_drag(&mut self, x: i32) -> bool {
        self.drag = None;
        if !self.enabled {
            return false;
        }
        if !self.locked && x >= self.start_pixel - HANDLER_WIDTH && x < self.start_pixel {
            self.drag = Some(DragKind::LeftHandle);
        } else if !self.locked && x >= self.end_pixel && x < self.end_pixel + HANDLER_WIDTH {
            self.drag = Some(DragKind::RightHandle);
        } else if x >= self.start_pixel && x < self.end_pixel {
            self.drag = Some(DragKind::Target);
        }
        self.drag.is_some()
    }

    /// Continues a drag. Handles keep one handle-width of separation, the
    /// hairline stays inside the selection.
    pub fn drag_to(&mut self, x: i32) -> Option<SelectionEvent> {
        let drag = self.drag?;
        match drag {
            DragKind::LeftHandle => {
                self.start_pixel = (x + HANDLER_WIDTH / 2)
                    .clamp(self.min_pixel, self.end_pixel - HANDLER_WIDTH);
                self.position_pixel = self.position_pixel.max(self.start_pixel);
            }
            DragKind::RightHandle => {
                self.end_pixel = (x - HANDLER_WIDTH / 2)
                    .clamp(self.start_pixel + HANDLER_WIDTH, self.max_pixel);
                self.position_pixel = self.position_pixel.min(self.end_pixel);
            }
            DragKind::Target => {
                self.position_pixel = x.clamp(self.start_pixel, self.end_pixel - 1);
            }
        }
        self.read_back_from_pixels();
        Some(SelectionEvent::Changing {
            start: self.range.sel_start(),
            end: self.range.sel_end(),
            position: self.range.sel_pos(),
        })
    }

    /// Ends a drag, or commits a simple click inside the selection.
    pub fn end_drag(&mut self, x: i32) -> Option<SelectionEvent> {
        let drag = self.drag.take()?;
        if !self.enabled {
            return None;
        }
        match drag {
            DragKind::Target => {
                // A simple click never went through drag_to.
                if x >= self.start_pixel && x < self.end_pixel {
                    self.position_pixel = x;
                }
                let position = self.mapper().timestamp_from_coord(self.position_pixel);
                self.range.set_position(position);
                Some(SelectionEvent::PositionAcquired(self.range.sel_pos()))
            }
            DragKind::LeftHandle | DragKind::RightHandle => {
                self.read_back_from_pixels();
                debug!(
                    start = self.range.sel_start(),
                    end = self.range.sel_end(),
                    "working zone committed"
                );
                Some(SelectionEvent::Changed {
                    start: self.range.sel_start(),
                    end: self.range.sel_end(),
                })
            }
        }
    }

    fn read_back_from_pixels(&mut self) {
        let mapper = self.mapper();
        let start = mapper.timestamp_from_coord(self.start_pixel);
        let end = mapper.timestamp_from_coord(self.end_pixel);
        let position = mapper.timestamp_from_coord(self.position_pixel);
        self.range.set_selection(start, end);
        self.range.set_position(position);
    }

    fn update_appearance(&mut self) {
        if self.range.duration() <= 0 {
            return;
        }
        let mapper = self.mapper();
        self.start_pixel = mapper.coord_from_timestamp(self.range.sel_start());
        self.end_pixel = mapper.coord_from_timestamp(self.range.sel_end());
        self.position_pixel = mapper.coord_from_timestamp(self.range.sel_pos());
    }
}

/// Immediate-mode panel wrapping the tracker. Returns the notifications
/// produced by this frame's interaction.
pub fn selection_tracker_panel(
    ui: &mut egui::Ui,
    tracker: &mut SelectionTracker,
) -> Vec<SelectionEvent> {
    let mut events = Vec::new();

    let desired = vec2(ui.available_width(), TRACKER_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
    tracker.resize(rect.width() as i32);

    let local_x = |pos: egui::Pos2| (pos.x - rect.min.x) as i32;

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            tracker.begin_drag(local_x(pos));
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(event) = tracker.drag_to(local_x(pos)) {
                events.push(event);
            }
        }
    }
    if response.drag_stopped() || response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if response.clicked() {
                tracker.begin_drag(local_x(pos));
            }
            if let Some(event) = tracker.end_drag(local_x(pos)) {
                events.push(event);
            }
        }
    }

    paint(ui, rect, tracker);
    events
}

fn paint(ui: &egui::Ui, rect: Rect, tracker: &SelectionTracker) {
    let painter = ui.painter().with_clip_rect(rect);
    let left = rect.min.x;
    let top = rect.min.y;
    let height = rect.height();

    painter.rect_filled(rect, theme::ROUNDING_SM, theme::GUTTER_BG);

    // Bumpers.
    let bumper_left = Rect::from_min_size(
        pos2(left + SPACER_WIDTH as f32, top),
        vec2(BUMPER_WIDTH as f32, height),
    );
    let bumper_right = Rect::from_min_size(
        pos2(left + tracker.max_pixel as f32, top),
        vec2(BUMPER_WIDTH as f32, height),
    );
    painter.rect_filled(bumper_left, theme::ROUNDING_SM, theme::BUMPER);
    painter.rect_filled(bumper_right, theme::ROUNDING_SM, theme::BUMPER);

    if !tracker.is_enabled() {
        return;
    }

    // Selection bar.
    let bar = Rect::from_min_max(
        pos2(left + tracker.start_pixel as f32, top + 3.0),
        pos2(left + tracker.end_pixel as f32, top + height - 3.0),
    );
    painter.rect_filled(bar, theme::ROUNDING_SM, theme::SELECTION_BAR);

    // Handles.
    let handle_left = Rect::from_min_size(
        pos2(left + (tracker.start_pixel - HANDLER_WIDTH) as f32, top + 1.0),
        vec2(HANDLER_WIDTH as f32, height - 2.0),
    );
    let handle_right = Rect::from_min_size(
        pos2(left + tracker.end_pixel as f32, top + 1.0),
        vec2(HANDLER_WIDTH as f32, height - 2.0),
    );
    painter.rect_filled(handle_left, theme::ROUNDING_SM, theme::HANDLE);
    painter.rect_filled(handle_right, theme::ROUNDING_SM, theme::HANDLE);

    // Position hairline.
    let x = left + tracker.position_pixel as f32;
    painter.line_segment(
        [pos2(x, top + 2.0), pos2(x, top + height - 2.0)],
        Stroke::new(1.0, theme::HAIRLINE),
    );
}

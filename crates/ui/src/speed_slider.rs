use egui::{pos2, vec2, Rect, Sense};
use frameline_state::timebase::rescale;

use crate::constants::{SLIDER_BUTTON_WIDTH, SLIDER_HEIGHT, SPACER_WIDTH};
use crate::theme;

/// Slow-motion percentage slider: 1..=200 with a sticky normal-speed notch
/// at 100, end buttons stepping by the large change, and keyboard jogging
/// at three granularities.
pub struct SpeedSlider {
    value: i32,
    minimum: i32,
    maximum: i32,
    sticky_value: i32,
    large_change: i32,

    min_pixel: i32,
    max_pixel: i32,

    enabled: bool,
    dragging: bool,
}

impl Default for SpeedSlider {
    fn default() -> Self {
        Self::new(300)
    }
}

impl SpeedSlider {
    pub fn new(width: i32) -> Self {
        let min_pixel = SLIDER_BUTTON_WIDTH + SPACER_WIDTH;
        let max_pixel = (width - SLIDER_BUTTON_WIDTH - SPACER_WIDTH).max(min_pixel + 1);
        Self {
            value: 100,
            minimum: 1,
            maximum: 200,
            sticky_value: 100,
            large_change: 5,
            min_pixel,
            max_pixel,
            enabled: true,
            dragging: false,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn large_change(&self) -> i32 {
        self.large_change
    }

    pub fn sticky_value(&self) -> i32 {
        self.sticky_value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn enable_disable(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    /// Programmatic set that does not report. For mirroring engine state.
    pub fn set_value(&mut self, value: i32) {
        self.value = value.clamp(self.minimum, self.maximum);
    }

    /// Set that reports the clamped value, like a user action would. Also
    /// the entry point the scheduler's safety valve uses when it lowers the
    /// speed.
    pub fn force_value(&mut self, value: i32) -> i32 {
        self.set_value(value);
        self.value
    }

    pub fn resize(&mut self, width: i32) {
        self.max_pixel = (width - SLIDER_BUTTON_WIDTH - SPACER_WIDTH).max(self.min_pixel + 1);
    }

    /// Keyboard jog: up or down to the next multiple of `factor` (25
    /// unmodified, 10 with shift, 1 with ctrl in the original bindings).
    pub fn jog(&mut self, up: bool, factor: i32) -> i32 {
        let factor = factor.max(1);
        if up {
            self.force_value(factor * (self.value / factor + 1))
        } else {
            self.force_value(factor * ((self.value - 1) / factor))
        }
    }

    pub fn step_down(&mut self) -> i32 {
        self.force_value(self.value - self.large_change)
    }

    pub fn step_up(&mut self) -> i32 {
        self.force_value(self.value + self.large_change)
    }

    /// Back to normal speed, the double-click action.
    pub fn snap_to_sticky(&mut self) -> i32 {
        self.force_value(self.sticky_value)
    }

    fn coord_from_value(&self, value: i32) -> i32 {
        self.min_pixel
            + rescale(
                (value - self.minimum) as i64,
                (self.maximum - self.minimum) as i64,
                (self.max_pixel - self.min_pixel) as i64,
            ) as i32
    }

    fn value_from_coord(&self, x: i32) -> i32 {
        self.minimum
            + rescale(
                (x - self.min_pixel) as i64,
                (self.max_pixel - self.min_pixel) as i64,
                (self.maximum - self.minimum) as i64,
            ) as i32
    }

    /// Mouse down or drag at pixel `x`. Returns the new value when it
    /// changed.
    pub fn mouse_move(&mut self, x: i32) -> Option<i32> {
        if !self.enabled || x <= self.min_pixel || x >= self.max_pixel {
            return None;
        }
        self.dragging = true;
        let value = self.value_from_coord(x).clamp(self.minimum, self.maximum);
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(value)
    }

    pub fn mouse_up(&mut self) {
        self.dragging = false;
    }
}

/// Immediate-mode panel wrapping the slider. Returns the new value when the
/// user changed it this frame.
pub fn speed_slider_panel(ui: &mut egui::Ui, slider: &mut SpeedSlider) -> Option<i32> {
    let mut changed = None;

    let desired = vec2(ui.available_width(), SLIDER_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
    slider.resize(rect.width() as i32);

    let local_x = |pos: egui::Pos2| (pos.x - rect.min.x) as i32;

    if response.double_clicked() {
        changed = Some(slider.snap_to_sticky());
    } else if response.dragged() || response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let x = local_x(pos);
            if x <= slider.min_pixel {
                changed = Some(slider.step_down());
            } else if x >= slider.max_pixel {
                changed = Some(slider.step_up());
            } else if let Some(value) = slider.mouse_move(x) {
                changed = Some(value);
            }
        }
    }
    if response.drag_stopped() {
        slider.mouse_up();
    }

    paint(ui, rect, slider);
    changed
}

fn paint(ui: &egui::Ui, rect: Rect, slider: &SpeedSlider) {
    let painter = ui.painter().with_clip_rect(rect);
    let left = rect.min.x;
    let top = rect.min.y;
    let height = rect.height();

    painter.rect_filled(rect, theme::ROUNDING_SM, theme::GUTTER_BG);

    let button_left = Rect::from_min_size(
        pos2(left + SPACER_WIDTH as f32, top),
        vec2(SLIDER_BUTTON_WIDTH as f32, height),
    );
    let button_right = Rect::from_min_size(
        pos2(left + slider.max_pixel as f32, top),
        vec2(SLIDER_BUTTON_WIDTH as f32, height),
    );
    painter.rect_filled(button_left, theme::ROUNDING_SM, theme::BUMPER);
    painter.rect_filled(button_right, theme::ROUNDING_SM, theme::BUMPER);

    if !slider.is_enabled() {
        return;
    }

    // Sticky notch at normal speed.
    let sticky_x = left + slider.coord_from_value(slider.sticky_value) as f32;
    painter.line_segment(
        [pos2(sticky_x, top + 2.0), pos2(sticky_x, top + height - 2.0)],
        egui::Stroke::new(1.0, theme::TEXT_DIM),
    );

    // Thumb.
    let thumb_x = left + slider.coord_from_value(slider.value) as f32;
    let thumb = Rect::from_center_size(
        pos2(thumb_x, top + height / 2.0),
        vec2(8.0, height - 2.0),
    );
    painter.rect_filled(thumb, theme::ROUNDING_SM, theme::HANDLE);
}

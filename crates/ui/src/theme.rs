use egui::{Color32, CornerRadius, Stroke, Style, Visuals};

pub const BG_DARK: Color32 = Color32::from_rgb(24, 26, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(32, 35, 42);
pub const BG_SURFACE: Color32 = Color32::from_rgb(44, 48, 58);
pub const ACCENT: Color32 = Color32::from_rgb(90, 170, 255);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 228, 228);
pub const TEXT_DIM: Color32 = Color32::from_rgb(140, 145, 160);

pub const GUTTER_BG: Color32 = Color32::from_rgb(38, 41, 49);
pub const BUMPER: Color32 = Color32::from_rgb(60, 64, 74);
pub const SELECTION_BAR: Color32 = Color32::from_rgb(70, 110, 160);
pub const HANDLE: Color32 = Color32::from_rgb(170, 190, 215);
pub const HAIRLINE: Color32 = Color32::from_rgb(20, 20, 20);
pub const CURSOR: Color32 = Color32::from_rgb(200, 205, 215);

pub const MARKER_POINT: Color32 = Color32::from_rgb(154, 205, 50);
pub const MARKER_SPAN: Color32 = Color32::from_rgb(100, 149, 237);
pub const MARKER_SYNC: Color32 = Color32::from_rgb(178, 34, 34);

pub const ROUNDING_SM: CornerRadius = CornerRadius::same(2);

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_DARK;

    visuals.widgets.noninteractive.bg_fill = BG_SURFACE;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.bg_fill = BG_SURFACE;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_DIM);
    visuals.widgets.hovered.bg_fill = BG_SURFACE.gamma_multiply(1.3);
    visuals.widgets.active.bg_fill = ACCENT;

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.visuals = visuals;
    ctx.set_style(style);
}

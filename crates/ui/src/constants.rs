/// Dead zone at each end of a tracker control, in pixels.
pub const SPACER_WIDTH: i32 = 10;
/// End bumper width, in pixels.
pub const BUMPER_WIDTH: i32 = 14;
/// Selection handle width, also the minimum visual separation between the
/// two handles.
pub const HANDLER_WIDTH: i32 = 10;
/// Frame tracker cursor width.
pub const CURSOR_WIDTH: i32 = 12;

pub const TRACKER_HEIGHT: f32 = 20.0;
pub const SLIDER_HEIGHT: f32 = 16.0;
/// Slider end-button width, in pixels.
pub const SLIDER_BUTTON_WIDTH: i32 = 14;

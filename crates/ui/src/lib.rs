pub mod constants;
pub mod frame_tracker;
pub mod render_target;
pub mod selection_tracker;
pub mod speed_slider;
pub mod theme;

pub use frame_tracker::{frame_tracker_panel, FrameTracker, PositionEvent};
pub use render_target::RepaintHandle;
pub use selection_tracker::{selection_tracker_panel, SelectionEvent, SelectionTracker};
pub use speed_slider::{speed_slider_panel, SpeedSlider};

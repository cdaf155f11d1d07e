pub mod constants;
pub mod events;
pub mod overlay;
pub mod playback_engine;
pub mod render;
pub mod sync;
pub mod workers;

pub use events::{EngineEvent, EngineMsg, StopReason};
pub use overlay::{NoOverlay, OverlayHost};
pub use playback_engine::PlaybackEngine;
pub use render::{GatedRenderTarget, ImmediateRenderTarget, RenderTarget};
pub use sync::{Side, SyncCoordinator};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use frameline_engine::render::RenderTarget;

/// egui-backed render target.
///
/// `request_repaint` wakes the egui loop and marks a frame pending; the
/// host calls [`mark_painted`] after it actually presented the frame, which
/// is what makes the scheduler's next tick an idle tick. Clones share
/// state, so the engine can own one handle while the host keeps another.
///
/// [`mark_painted`]: RepaintHandle::mark_painted
#[derive(Clone)]
pub struct RepaintHandle {
    ctx: egui::Context,
    pending: Arc<AtomicBool>,
}

impl RepaintHandle {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The frame requested by the engine has been drawn.
    pub fn mark_painted(&self) {
        self.pending.store(false, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl RenderTarget for RepaintHandle {
    fn request_repaint(&mut self) {
        self.pending.store(true, Ordering::Release);
        self.ctx.request_repaint();
    }

    fn is_idle(&self) -> bool {
        !self.pending.load(Ordering::Acquire)
    }
}

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Narrow seam between the scheduler and whatever surface displays frames.
pub trait RenderTarget {
    /// Asks the host to present the decode layer's current image.
    fn request_repaint(&mut self);

    /// True when the previously requested repaint has been consumed. The
    /// scheduler decodes only on idle ticks; busy ticks accumulate frame
    /// skips instead of queueing work.
    fn is_idle(&self) -> bool;
}

/// Target that consumes every repaint immediately. Headless operation.
#[derive(Debug, Default)]
pub struct ImmediateRenderTarget {
    pub repaints: u64,
}

impl RenderTarget for ImmediateRenderTarget {
    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn is_idle(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
struct GatedState {
    busy: AtomicBool,
    repaints: AtomicU64,
}

/// Target whose idle state is driven from outside, the way a real UI pump
/// flips busy until the requested frame has actually been drawn. Clones
/// share state, so a host can keep one handle while the engine owns the
/// other.
#[derive(Debug, Clone, Default)]
pub struct GatedRenderTarget {
    state: Arc<GatedState>,
}

impl GatedRenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the pending repaint as consumed (or forces busy for tests).
    pub fn set_idle(&self, idle: bool) {
        self.state.busy.store(!idle, Ordering::Release);
    }

    pub fn repaints(&self) -> u64 {
        self.state.repaints.load(Ordering::Acquire)
    }
}

impl RenderTarget for GatedRenderTarget {
    fn request_repaint(&mut self) {
        self.state.repaints.fetch_add(1, Ordering::AcqRel);
        self.state.busy.store(true, Ordering::Release);
    }

    fn is_idle(&self) -> bool {
        !self.state.busy.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_target_goes_busy_on_request_and_idle_on_consume() {
        let handle = GatedRenderTarget::new();
        let mut target = handle.clone();
        assert!(target.is_idle());
        target.request_repaint();
        assert!(!target.is_idle());
        assert_eq!(handle.repaints(), 1);
        handle.set_idle(true);
        assert!(target.is_idle());
    }
}

use frameline_state::Timestamp;

/// Seam to the annotation/overlay collaborator.
pub trait OverlayHost {
    /// Called after every successful decode with the new absolute position
    /// and whether a synchronized ghost image should be composited.
    fn frame_rendered(&mut self, position: Timestamp, merge_active: bool);

    /// Whether a point-tracking edit is following frames right now. While
    /// true the scheduler waits instead of skipping frames, because
    /// trackers need every frame.
    fn has_active_tracking(&self) -> bool {
        false
    }

    /// Force-stop any in-progress tracking. Called whenever the playhead
    /// jumps more than one frame or seeks arbitrarily; frame-to-frame
    /// tracking assumes contiguous frames.
    fn stop_all_tracking(&mut self) {}
}

/// Host for engines without an annotation layer.
#[derive(Debug, Default)]
pub struct NoOverlay;

impl OverlayHost for NoOverlay {
    fn frame_rendered(&mut self, _position: Timestamp, _merge_active: bool) {}
}

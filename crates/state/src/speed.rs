pub const MIN_SLOWMOTION_PERCENTAGE: f64 = 1.0;
pub const MAX_SLOWMOTION_PERCENTAGE: f64 = 200.0;
/// One "large change" step of the speed slider, also the unit the scheduler
/// uses when it lowers the speed to recover from sustained frame drops.
pub const SPEED_LARGE_STEP: f64 = 5.0;

/// Interval used when the source carries no usable frame interval.
pub const FALLBACK_FRAME_INTERVAL_MS: f64 = 40.0;
/// Floor for the timer period so a high speed on a high-fps source can never
/// produce a zero or negative interval.
pub const MIN_FRAME_INTERVAL_MS: f64 = 5.0;

/// User-selected slow-motion percentage plus the fixed high-speed capture
/// factor (footage recorded faster than it plays back).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControl {
    slowmotion_percentage: f64,
    high_speed_factor: f64,
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self {
            slowmotion_percentage: 100.0,
            high_speed_factor: 1.0,
        }
    }
}

impl SpeedControl {
    pub fn slowmotion_percentage(&self) -> f64 {
        self.slowmotion_percentage
    }

    pub fn high_speed_factor(&self) -> f64 {
        self.high_speed_factor
    }

    pub fn set_slowmotion_percentage(&mut self, percentage: f64) {
        self.slowmotion_percentage =
            percentage.clamp(MIN_SLOWMOTION_PERCENTAGE, MAX_SLOWMOTION_PERCENTAGE);
    }

    pub fn set_high_speed_factor(&mut self, factor: f64) {
        self.high_speed_factor = factor.max(0.0);
    }

    fn effective_factor(&self) -> f64 {
        if self.high_speed_factor > 0.0 {
            self.high_speed_factor
        } else {
            1.0
        }
    }

    /// Percentage of real-world speed. This is the value synchronized
    /// engines exchange: a 10x high-speed capture played at 100% runs at 10%
    /// of real time.
    pub fn realtime_percentage(&self) -> f64 {
        self.slowmotion_percentage / self.effective_factor()
    }

    /// Inverse of [`realtime_percentage`]: adopt a real-world percentage
    /// coming from another engine, expressed in this engine's own
    /// slow-motion terms.
    ///
    /// [`realtime_percentage`]: SpeedControl::realtime_percentage
    pub fn set_realtime_percentage(&mut self, percentage: f64) {
        self.set_slowmotion_percentage(percentage * self.effective_factor());
    }

    /// Milliseconds between scheduler ticks for a source with the given
    /// native frame interval.
    pub fn playback_interval_ms(&self, native_frame_interval_ms: f64) -> f64 {
        if native_frame_interval_ms > 0.0 && self.slowmotion_percentage > 0.0 {
            (native_frame_interval_ms / (self.slowmotion_percentage / 100.0))
                .max(MIN_FRAME_INTERVAL_MS)
        } else {
            FALLBACK_FRAME_INTERVAL_MS
        }
    }

    /// One large step down, saturating at the minimum. Returns whether the
    /// percentage actually changed.
    pub fn large_step_down(&mut self) -> bool {
        if self.slowmotion_percentage >= MIN_SLOWMOTION_PERCENTAGE + SPEED_LARGE_STEP {
            self.slowmotion_percentage -= SPEED_LARGE_STEP;
            true
        } else {
            false
        }
    }
}

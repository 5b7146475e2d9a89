use std::time::Duration;

/// Per-frame timing accumulators.
///
/// `frame` and `render` are filled by [`TimeScope`](super::TimeScope)s during an
/// iteration. [`begin_frame`](Self::begin_frame) rotates them into the `last_*`
/// snapshot and zeroes them, so readers outside the loop always see a complete
/// previous frame rather than a half-measured current one.
///
/// The values are for diagnostics and motion pacing only; nothing branches on them.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Wall time of the current iteration from camera motion through swap.
    ///
    /// Event polling happens in the runtime before the iteration starts and is
    /// not included here or in [`motion_dt`](Self::motion_dt).
    pub frame: Duration,

    /// Render-only wall time of the current iteration.
    pub render: Duration,

    last_frame: Duration,
    last_render: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameTiming {
    /// Creates timing state with default delta-time clamps.
    ///
    /// The minimum keeps tight loops from producing zero motion steps; the maximum
    /// keeps a debugger pause or a minimized window from flinging the camera.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates timing state with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            frame: Duration::ZERO,
            render: Duration::ZERO,
            last_frame: Duration::ZERO,
            last_render: Duration::ZERO,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Starts a new iteration: snapshots and resets both accumulators.
    ///
    /// Returns the index of the frame that is starting.
    pub fn begin_frame(&mut self) -> u64 {
        self.last_frame = std::mem::take(&mut self.frame);
        self.last_render = std::mem::take(&mut self.render);
        self.frame_index = self.frame_index.wrapping_add(1);
        self.frame_index
    }

    /// Total time of the previous iteration.
    pub fn last_frame(&self) -> Duration {
        self.last_frame
    }

    /// Render time of the previous iteration.
    pub fn last_render(&self) -> Duration {
        self.last_render
    }

    /// Index of the current iteration (the first frame is 1).
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Previous frame time, clamped, in seconds. Used as the camera motion step.
    pub fn motion_dt(&self) -> f32 {
        self.last_frame.clamp(self.dt_min, self.dt_max).as_secs_f32()
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_rotates_and_resets() {
        let mut timing = FrameTiming::new();
        timing.frame = Duration::from_millis(16);
        timing.render = Duration::from_millis(4);

        assert_eq!(timing.begin_frame(), 1);
        assert_eq!(timing.frame, Duration::ZERO);
        assert_eq!(timing.render, Duration::ZERO);
        assert_eq!(timing.last_frame(), Duration::from_millis(16));
        assert_eq!(timing.last_render(), Duration::from_millis(4));
        assert_eq!(timing.frame_index(), 1);
    }

    #[test]
    fn motion_dt_is_clamped() {
        let mut timing = FrameTiming::new();
        timing.begin_frame();
        assert!((timing.motion_dt() - 0.0001).abs() < 1e-6);

        timing.frame = Duration::from_secs(5);
        timing.begin_frame();
        assert!((timing.motion_dt() - 0.25).abs() < 1e-6);

        timing.frame = Duration::from_millis(20);
        timing.begin_frame();
        assert!((timing.motion_dt() - 0.02).abs() < 1e-6);
    }
}
